mod api;
mod app;
mod config;
mod controller;
mod countdown;
mod dispatch;
mod domain;
mod input;
mod logging;
mod notifications;
mod persistence;
mod report;
mod session;
mod ticker;
mod ui;

use anyhow::{anyhow, bail, Context, Result};
use api::{ApiClient, ApiError, HttpApi, SignupRequest};
use app::AppState;
use clap::{Parser, Subcommand};
use config::Config;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::ProgressRange;
use persistence::{config_file, ensure_app_dir, log_file, session_file};
use ratatui::{backend::CrosstermBackend, Terminal};
use session::{default_display_name, Session, SessionStore};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "momentum")]
#[command(about = "Tasks, habits, pomodoro focus and AI nudges in your terminal", long_about = None)]
struct Cli {
    /// Base URL of the productivity API (overrides config and MOMENTUM_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account. The password is read from stdin.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
    },
    /// Log in and remember the session. The password is read from stdin.
    Login {
        #[arg(long)]
        email: String,
    },
    /// Forget the stored session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Write a Markdown progress report
    Report {
        /// week, month or quarter. Defaults to week.
        #[arg(short, long)]
        range: Option<String>,
        /// Output file path. Defaults to ~/.momentum/report-YYYY-MM-DD-<range>.md
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let app_dir = ensure_app_dir()?;
    logging::init(&log_file(&app_dir))?;

    let config = Config::load(&config_file(&app_dir))?
        .with_overrides(std::env::var(config::API_URL_ENV).ok(), cli.api_url);
    let mut sessions = SessionStore::open(session_file(&app_dir))?;
    tracing::info!(api_url = %config.api_url, dir = %app_dir.display(), "starting");

    match cli.command {
        Some(Commands::Signup { name, email, phone }) => {
            let password = read_password("Password: ")?;
            let confirm = read_password("Confirm password: ")?;
            if password != confirm {
                bail!("Passwords do not match");
            }

            let api = HttpApi::new(&config.api_url, config.request_timeout(), None)?;
            api.signup(&SignupRequest {
                full_name: name,
                email: email.clone(),
                phone,
                password,
            })
            .context("Signup failed")?;
            println!("Account created for {}. Run 'momentum login --email {}' next.", email, email);
            Ok(())
        }
        Some(Commands::Login { email }) => {
            let password = read_password("Password: ")?;
            let api = HttpApi::new(&config.api_url, config.request_timeout(), None)?;
            let token = api.login(&email, &password).map_err(|err| match err {
                ApiError::Status { status: 401, .. } => anyhow!("Invalid email or password"),
                other => anyhow::Error::new(other).context("Login failed"),
            })?;

            sessions.login(Session::from_token(token, default_display_name(&email)))?;
            println!("Logged in as {}", default_display_name(&email));
            Ok(())
        }
        Some(Commands::Logout) => {
            sessions.logout()?;
            println!("Logged out");
            Ok(())
        }
        Some(Commands::Whoami) => {
            match sessions.current() {
                Some(session) => match &session.user_id {
                    Some(id) => println!("{} (user {})", session.display_name, id),
                    None => println!("{}", session.display_name),
                },
                None => println!("Not logged in"),
            }
            Ok(())
        }
        Some(Commands::Report { range, output }) => {
            let range = match range {
                Some(value) => ProgressRange::from_query(&value)
                    .ok_or_else(|| anyhow!("Invalid range '{}'. Use week, month or quarter.", value))?,
                None => ProgressRange::Week,
            };
            let api = authed_api(&config, &sessions)?;

            println!("Generating {} report...", range.as_query());
            let path = report::generate_report(&api, range, output.map(PathBuf::from), &app_dir)?;
            println!("Report generated: {}", path.display());
            Ok(())
        }
        None => run_tui(&config, &sessions),
    }
}

/// API client carrying the stored session's token
fn authed_api(config: &Config, sessions: &SessionStore) -> Result<HttpApi> {
    let token = sessions
        .token()
        .ok_or_else(|| anyhow!("Not logged in. Run 'momentum login --email <email>' first."))?;
    Ok(HttpApi::new(
        &config.api_url,
        config.request_timeout(),
        Some(token.to_string()),
    )?)
}

/// Prompt on stderr and read a password without echoing it.
/// Piped input is read as a plain line.
fn read_password(prompt: &str) -> Result<String> {
    eprint!("{}", prompt);
    io::stderr().flush()?;

    if !io::stdin().is_terminal() {
        let mut line = String::new();
        io::stdin()
            .read_line(&mut line)
            .context("Failed to read password")?;
        return Ok(line.trim_end_matches(|c| c == '\r' || c == '\n').to_string());
    }

    enable_raw_mode()?;
    let result = read_hidden_line();
    disable_raw_mode()?;
    eprintln!();
    result
}

#[derive(Debug, PartialEq)]
enum PasswordKey {
    Continue,
    Done,
    Cancelled,
}

fn apply_password_key(password: &mut String, key: KeyEvent) -> PasswordKey {
    match key.code {
        KeyCode::Enter => PasswordKey::Done,
        KeyCode::Esc => PasswordKey::Cancelled,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => PasswordKey::Cancelled,
        KeyCode::Backspace => {
            password.pop();
            PasswordKey::Continue
        }
        KeyCode::Char(c) => {
            password.push(c);
            PasswordKey::Continue
        }
        _ => PasswordKey::Continue,
    }
}

fn read_hidden_line() -> Result<String> {
    let mut password = String::new();
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match apply_password_key(&mut password, key) {
                PasswordKey::Continue => {}
                PasswordKey::Done => return Ok(password),
                PasswordKey::Cancelled => bail!("Cancelled"),
            }
        }
    }
}

fn run_tui(config: &Config, sessions: &SessionStore) -> Result<()> {
    let api = Arc::new(authed_api(config, sessions)?);
    let user_name = sessions
        .current()
        .map(|s| s.display_name.clone())
        .unwrap_or_default();

    // Create app state and start the initial fetches
    let mut app = AppState::new(api, config, user_name);
    app.load_all();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "event loop failed");
    }

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let tick_rate = ticker::tick_duration();

    loop {
        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        // Settled requests
        app.pump();

        // Tick the countdown
        app.tick(Instant::now());
    }
}
