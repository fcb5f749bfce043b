/// CineVault - terminal client for the myFlix movie catalog
use chrono::NaiveDate;
use cinevault_cli::{config::AppConfig, terminal, TerminalNavigator, TerminalNotifier};
use cinevault_client::CineVaultClient;
use cinevault_core::{token, FileSessionStore, MovieId, SessionState, UserUpdate};
use cinevault_views::{
    CatalogView, DetailSection, LoginView, MutationStatus, NavigationShell, ProfileView,
    RegistrationView, SessionGuard,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cinevault")]
#[command(about = "Browse the CineVault movie catalog and manage your favorites", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API base URL, overriding the configuration
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file, overriding the configuration
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        /// Username (letters and digits, at least 5)
        #[arg(short, long)]
        username: String,
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password; prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
        /// Birthdate (YYYY-MM-DD)
        #[arg(short, long)]
        birthdate: Option<NaiveDate>,
    },
    /// Log in and store the session
    Login {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Password; prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Clear the stored session
    Logout,
    /// Show who is logged in
    Status,
    /// List the catalog
    Movies {
        /// Filter by title, director or genre
        #[arg(short, long)]
        search: Option<String>,
        /// Only show favorites
        #[arg(short, long)]
        favorites: bool,
    },
    /// Show one movie
    Show {
        /// Movie id
        id: String,
        /// Detail section to expand
        #[arg(short, long, value_enum)]
        section: Option<Section>,
    },
    /// Add a movie to your favorites
    Favorite {
        /// Movie id
        id: String,
    },
    /// Remove a movie from your favorites
    Unfavorite {
        /// Movie id
        id: String,
    },
    /// List your favorite movies
    Favorites,
    /// Show your profile
    Profile,
    /// Update your profile
    UpdateProfile {
        /// Username; defaults to the logged-in user
        #[arg(short, long)]
        username: Option<String>,
        /// Email address
        #[arg(short, long)]
        email: String,
        /// New password
        #[arg(short, long)]
        password: Option<String>,
        /// Birthdate (YYYY-MM-DD)
        #[arg(short, long)]
        birthdate: Option<NaiveDate>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Section {
    Synopsis,
    Genre,
    Director,
}

impl From<Section> for DetailSection {
    fn from(section: Section) -> Self {
        match section {
            Section::Synopsis => DetailSection::Synopsis,
            Section::Genre => DetailSection::Genre,
            Section::Director => DetailSection::Director,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinevault=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api.url = url;
    }
    if let Some(path) = cli.session_file {
        config.session.path = path;
    }
    config.validate()?;

    let app = App::new(&config)?;

    let ok = match cli.command {
        Commands::Register {
            username,
            email,
            password,
            birthdate,
        } => app.register(username, email, password, birthdate).await?,
        Commands::Login { username, password } => app.login(username, password).await?,
        Commands::Logout => app.logout(),
        Commands::Status => app.status()?,
        Commands::Movies { search, favorites } => app.movies(search, favorites).await,
        Commands::Show { id, section } => app.show(&MovieId::new(id), section).await,
        Commands::Favorite { id } => app.set_favorite(&MovieId::new(id), true).await,
        Commands::Unfavorite { id } => app.set_favorite(&MovieId::new(id), false).await,
        Commands::Favorites => app.favorites().await,
        Commands::Profile => app.profile().await,
        Commands::UpdateProfile {
            username,
            email,
            password,
            birthdate,
        } => app.update_profile(username, email, password, birthdate).await?,
    };

    if let Some(hint) = app.navigator.hint() {
        println!("{}", hint);
    }

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Shared wiring for every command.
struct App {
    client: CineVaultClient,
    session: SessionState,
    notifier: Arc<TerminalNotifier>,
    navigator: Arc<TerminalNavigator>,
}

impl App {
    fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let store = FileSessionStore::open(config.session.path.clone())?;
        tracing::debug!(path = %store.path().display(), "Session file opened");

        let session = SessionState::new(Arc::new(store));
        let client = CineVaultClient::new(config.client_config(), session.clone())?;

        Ok(Self {
            client,
            session,
            notifier: Arc::new(TerminalNotifier),
            navigator: Arc::new(TerminalNavigator::default()),
        })
    }

    fn guard(&self) -> SessionGuard {
        SessionGuard::new(
            self.session.clone(),
            self.notifier.clone(),
            self.navigator.clone(),
        )
    }

    async fn register(
        &self,
        username: String,
        email: String,
        password: Option<String>,
        birthdate: Option<NaiveDate>,
    ) -> anyhow::Result<bool> {
        let password = password_or_prompt(password)?;

        let mut view = RegistrationView::new(self.client.clone(), self.guard());
        let form = view.form_mut();
        form.username = username;
        form.email = email;
        form.password = password;
        form.birthdate = birthdate;

        Ok(view.submit().await)
    }

    async fn login(&self, username: String, password: Option<String>) -> anyhow::Result<bool> {
        let password = password_or_prompt(password)?;

        let mut view = LoginView::new(self.client.clone(), self.guard());
        let form = view.form_mut();
        form.username = username;
        form.password = password;

        Ok(view.submit().await)
    }

    fn logout(&self) -> bool {
        NavigationShell::new(self.guard()).logout();
        true
    }

    fn status(&self) -> anyhow::Result<bool> {
        let view = LoginView::new(self.client.clone(), self.guard());
        if !view.activate() {
            println!("Not logged in.");
            return Ok(true);
        }

        let expires_at = self
            .session
            .token()?
            .as_deref()
            .and_then(token::decode_claims)
            .and_then(|claims| claims.expires_at());
        if let Some(expires_at) = expires_at {
            println!("Session expires at {}", expires_at.to_rfc3339());
        }
        Ok(true)
    }

    async fn movies(&self, search: Option<String>, favorites_only: bool) -> bool {
        let mut catalog = CatalogView::new(self.client.clone(), self.guard());
        if !catalog.load().await {
            return false;
        }
        if let Some(query) = search {
            catalog.set_search(query);
        }

        let visible: Vec<_> = catalog
            .visible()
            .into_iter()
            .filter(|e| !favorites_only || e.is_favorite)
            .collect();

        if visible.is_empty() {
            println!("No movies match.");
        }
        for entry in visible {
            println!("{}", terminal::render_entry(entry));
        }
        true
    }

    async fn show(&self, id: &MovieId, section: Option<Section>) -> bool {
        let mut catalog = CatalogView::new(self.client.clone(), self.guard());
        if !catalog.load().await {
            return false;
        }

        let Some(entry) = catalog.entry(id) else {
            eprintln!("error: Movie not found: {}", id);
            return false;
        };
        let movie = entry.movie.clone();
        println!("{}", terminal::render_entry(entry));

        if let Some(section) = section {
            let section = DetailSection::from(section);
            catalog.toggle_section(id, section);
            println!();
            println!("{}", terminal::render_section(&movie, section));
        } else if !movie.image_path.is_empty() {
            println!("Poster: {}", movie.image_path);
        }
        true
    }

    async fn set_favorite(&self, id: &MovieId, favorite: bool) -> bool {
        let mut catalog = CatalogView::new(self.client.clone(), self.guard());
        if !catalog.load().await {
            return false;
        }

        match catalog.entry(id).map(|e| e.is_favorite) {
            None => {
                eprintln!("error: Movie not found: {}", id);
                false
            }
            Some(current) if current == favorite => {
                let state = if favorite { "in" } else { "not in" };
                println!("{} is already {} your favorites.", id, state);
                true
            }
            Some(_) => {
                catalog.toggle_favorite(id);
                catalog.settle().await;
                !catalog
                    .favorites()
                    .log()
                    .iter()
                    .any(|m| matches!(m.status, MutationStatus::Failed(_)))
            }
        }
    }

    async fn favorites(&self) -> bool {
        let mut profile = ProfileView::new(self.client.clone(), self.guard());
        if !profile.load().await {
            return false;
        }

        let movies = profile.favorite_movies();
        if movies.is_empty() {
            println!("You have no favorite movies yet.");
        }
        for movie in movies {
            println!("* {}", terminal::render_movie(movie));
        }
        true
    }

    async fn profile(&self) -> bool {
        let mut profile = ProfileView::new(self.client.clone(), self.guard());
        if !profile.load().await {
            return false;
        }

        if let Some(user) = profile.user() {
            println!("{}", terminal::render_user(user));
        }
        println!("Favorites: {}", profile.favorites().len());
        for movie in profile.favorite_movies() {
            println!("  * {}", terminal::render_movie(movie));
        }
        true
    }

    async fn update_profile(
        &self,
        username: Option<String>,
        email: String,
        password: Option<String>,
        birthdate: Option<NaiveDate>,
    ) -> anyhow::Result<bool> {
        let username = match username {
            Some(username) => username,
            None => self.session.username()?.unwrap_or_default(),
        };

        let update = UserUpdate {
            username: Some(username),
            email: Some(email),
            password,
            birthdate,
        };

        let mut profile = ProfileView::new(self.client.clone(), self.guard());
        let updated = profile.update_profile(update).await;
        if let Some(user) = profile.user() {
            println!("{}", terminal::render_user(user));
        }
        Ok(updated)
    }
}

fn password_or_prompt(password: Option<String>) -> std::io::Result<String> {
    match password {
        Some(password) => Ok(password),
        None => rpassword::prompt_password("Password: "),
    }
}
