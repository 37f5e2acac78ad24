use clap::{Arg, Command};
use serde_json::json;
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tindigwa::api::{ApiClient, ApiError, UreqTransport};
use tindigwa::app::{App, WizardOutcome};
use tindigwa::config::AppConfig;
use tindigwa::core::FormController;
use tindigwa::core::FormRecord;
use tindigwa::domain::catalog::CatalogStore;
use tindigwa::domain::clients::{self, ClientSubmission, SaveMode};
use tindigwa::domain::expenses::{self, ExpenseSubmission};
use tindigwa::domain::login::{self, LoginSubmission};
use tindigwa::domain::staff::{self, StaffSubmission};
use tindigwa::session::SessionStore;
use tindigwa::terminal::{Terminal, TerminalEvent};
use tindigwa::upload::{Attachment, AttachmentKind};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn cli() -> Command {
    Command::new("tindigwa")
        .about("Terminal client for the Tindigwa loan-management backend")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .global(true)
                .help("Config file (defaults to the user config dir)"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .value_name("URL")
                .global(true)
                .help("Override the backend base URL"),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("login").about("Sign in and store the session token"))
        .subcommand(Command::new("client-add").about("Register a new client"))
        .subcommand(
            Command::new("client-edit")
                .about("Edit an existing client")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(Command::new("staff-add").about("Register a new staff member"))
        .subcommand(
            Command::new("staff-edit")
                .about("Edit a staff member")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(Command::new("expense-add").about("Record an expense"))
        .subcommand(
            Command::new("expense-import")
                .about("Bulk-import expenses from a CSV file")
                .arg(Arg::new("file").required(true)),
        )
        .subcommand(
            Command::new("loan")
                .about("Act on a loan")
                .arg(
                    Arg::new("action")
                        .required(true)
                        .value_parser(["approve", "reject", "disburse", "schedule", "summary"]),
                )
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(
            Command::new("payment")
                .about("Process a loan payment")
                .arg(Arg::new("loan-id").required(true))
                .arg(Arg::new("amount").required(true)),
        )
        .subcommand(Command::new("ping").about("Check backend connectivity"))
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), Box<dyn Error>> {
    let matches = cli().get_matches();
    init_tracing();

    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let mut config = AppConfig::load(config_path.as_deref())?;
    if let Some(url) = matches.get_one::<String>("base-url") {
        config.api_base_url = url.clone();
    }

    let session = SessionStore::load(&SessionStore::default_path());
    let mut api = ApiClient::new(
        config.api_base_url.clone(),
        Box::new(UreqTransport::new(Duration::from_secs(
            config.request_timeout_secs,
        ))),
    );
    api.set_token(session.token().map(str::to_string));

    match matches.subcommand() {
        Some(("ping", _)) => ping(&api),
        Some(("loan", sub)) => {
            let action = sub.get_one::<String>("action").expect("required arg");
            let id = sub.get_one::<String>("id").expect("required arg");
            print_json(loan_action(&api, action, id)?);
            Ok(())
        }
        Some(("payment", sub)) => {
            let loan_id = sub.get_one::<String>("loan-id").expect("required arg");
            let amount: f64 = sub
                .get_one::<String>("amount")
                .expect("required arg")
                .parse()?;
            print_json(api.process_payment(json!({ "loanId": loan_id, "amount": amount }))?);
            Ok(())
        }
        Some(("expense-import", sub)) => {
            let path = PathBuf::from(sub.get_one::<String>("file").expect("required arg"));
            let csv = Attachment::load(AttachmentKind::CsvImport, &path)?;
            print_json(api.import_expenses(csv)?);
            Ok(())
        }
        Some(("login", _)) => {
            let controller = FormController::new(login::flow(&config.routes.dashboard));
            let app = App::new(controller, Box::new(LoginSubmission), api, session).store_login();
            finish(run_wizard(app)?)
        }
        Some(("client-add", _)) => {
            let controller = FormController::with_record(
                clients::flow(&config.routes.clients),
                clients::defaults(),
            );
            let adapter = Box::new(ClientSubmission::new(SaveMode::Create));
            finish(run_wizard(App::new(controller, adapter, api, session))?)
        }
        Some(("client-edit", sub)) => {
            let id = sub.get_one::<String>("id").expect("required arg").clone();
            let entity = fetch_entity(api.fetch_client(&id))?;
            let controller = FormController::with_record(
                clients::flow(&config.routes.clients),
                FormRecord::from_entity(&entity),
            );
            let adapter = Box::new(ClientSubmission::new(SaveMode::Update(id)));
            finish(run_wizard(App::new(controller, adapter, api, session))?)
        }
        Some(("staff-add", _)) => {
            let mode = SaveMode::Create;
            let controller = FormController::new(staff::flow(&mode, &config.routes.staff));
            let adapter = Box::new(StaffSubmission::new(mode));
            finish(run_wizard(App::new(controller, adapter, api, session))?)
        }
        Some(("staff-edit", sub)) => {
            let id = sub.get_one::<String>("id").expect("required arg").clone();
            let entity = fetch_entity(api.fetch_staff(&id))?;
            let mode = SaveMode::Update(id);
            let controller = FormController::with_record(
                staff::flow(&mode, &config.routes.staff),
                FormRecord::from_entity(&entity),
            );
            let adapter = Box::new(StaffSubmission::new(mode));
            finish(run_wizard(App::new(controller, adapter, api, session))?)
        }
        Some(("expense-add", _)) => {
            let mut catalogs = CatalogStore::new();
            if let Err(err) = catalogs.refresh(&api) {
                eprintln!("{}", err.user_message());
                std::process::exit(1);
            }
            let controller = FormController::new(expenses::flow(
                catalogs.snapshot(),
                &config.routes.dashboard,
            ));
            let adapter = Box::new(ExpenseSubmission::new(catalogs.snapshot().to_vec()));
            finish(run_wizard(App::new(controller, adapter, api, session))?)
        }
        _ => unreachable!("subcommand is required"),
    }
}

fn ping(api: &ApiClient) -> Result<(), Box<dyn Error>> {
    match api.check_connection() {
        Ok(()) => {
            println!("Backend reachable at {}", api.base_url());
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err.user_message());
            std::process::exit(1);
        }
    }
}

fn loan_action(api: &ApiClient, action: &str, id: &str) -> Result<serde_json::Value, ApiError> {
    match action {
        "approve" => api.approve_loan(id),
        "reject" => api.reject_loan(id),
        "disburse" => api.disburse_loan(id),
        "schedule" => api.loan_schedule(id),
        "summary" => api.loan_summary(id),
        _ => unreachable!("clap restricts loan actions"),
    }
}

fn print_json(body: serde_json::Value) {
    match serde_json::to_string_pretty(&body) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{body}"),
    }
}

/// Detail endpoints answer either the entity itself or `{ "data": {...} }`.
fn fetch_entity(result: Result<serde_json::Value, ApiError>) -> Result<serde_json::Value, Box<dyn Error>> {
    match result {
        Ok(body) => match body.get("data") {
            Some(data) if data.is_object() => Ok(data.clone()),
            _ => Ok(body),
        },
        Err(err) => {
            eprintln!("{}", err.user_message());
            std::process::exit(1);
        }
    }
}

fn finish(outcome: WizardOutcome) -> Result<(), Box<dyn Error>> {
    if outcome.cancelled {
        println!("Cancelled.");
    } else if let Some(route) = outcome.route {
        println!("Saved. Next: {route}");
    }
    Ok(())
}

fn run_wizard(mut app: App) -> io::Result<WizardOutcome> {
    let mut terminal = Terminal::new()?;
    terminal.enter_raw_mode()?;
    terminal.hide_cursor()?;
    terminal.clear_all()?;

    let result = event_loop(&mut terminal, &mut app);

    terminal.show_cursor()?;
    terminal.exit_raw_mode()?;
    println!();

    result.map(|_| app.outcome())
}

fn event_loop(terminal: &mut Terminal, app: &mut App) -> io::Result<()> {
    let mut render_requested = true;

    loop {
        if terminal.poll(Duration::from_millis(100))? {
            match terminal.read_event()? {
                TerminalEvent::Key(key_event) => {
                    app.handle_key(key_event);
                    render_requested = true;
                }
                TerminalEvent::Resize { .. } => {
                    render_requested = true;
                }
            }
        }

        if app.submit_pending() {
            // Paint the saving state before the blocking call.
            app.render(terminal)?;
            app.run_pending_submission();
            render_requested = true;
        }

        if app.tick() {
            render_requested = true;
        }

        if render_requested {
            app.render(terminal)?;
            render_requested = false;
        }

        if app.should_exit() {
            break;
        }
    }

    Ok(())
}
