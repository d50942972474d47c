use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use colored::*;
use frontdesk_auth::{GuardDecision, Route, SERVER_UNREACHABLE};
use frontdesk_config::load as load_config;
use frontdesk_gateway::{ApiError, Booking, EntityId, Guest, Room};
use frontdesk_runtime::{telemetry, ClientServices, TokenPersistence};
use frontdesk_screens::{
    BookingForm, BookingsScreen, DashboardScreen, GuestForm, GuestsScreen, LoginScreen, Notice,
    RegisterScreen, ResourceForm, ResourceScreen, RoomForm, RoomsScreen, ScreenResource,
};
use tracing::debug;

mod render;

use render::Tabular;

const SIGNED_OUT: &str = "Not signed in. Run `frontdesk login` first.";

#[derive(Parser)]
#[command(name = "frontdesk")]
#[command(about = "Manage hotel guests, rooms and bookings from the terminal")]
#[command(version)]
struct Cli {
    /// Backend base URL, including the `/api` prefix
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// File holding the session token between runs
    #[arg(long, global = true)]
    token_file: Option<String>,

    /// Keep the session in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and keep the session for later commands
    Login {
        /// Read from stdin when omitted
        #[arg(long)]
        email: Option<String>,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create a staff account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Today's figures and the latest bookings
    Dashboard {
        /// Day to report on (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    #[command(subcommand)]
    Guests(GuestCommand),
    #[command(subcommand)]
    Rooms(RoomCommand),
    #[command(subcommand)]
    Bookings(BookingCommand),
}

#[derive(Subcommand)]
enum GuestCommand {
    List,
    Show { id: String },
    Create(GuestFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: GuestFields,
    },
    Delete { id: String },
}

#[derive(Subcommand)]
enum RoomCommand {
    List,
    Show { id: String },
    Create(RoomFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: RoomFields,
    },
    Delete { id: String },
}

#[derive(Subcommand)]
enum BookingCommand {
    List,
    Show { id: String },
    Create(BookingFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: BookingFields,
    },
    Delete { id: String },
}

#[derive(Args)]
struct GuestFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    address: Option<String>,
}

#[derive(Args)]
struct RoomFields {
    #[arg(long = "number")]
    room_number: Option<String>,
    /// Single, Double, Suite or Deluxe
    #[arg(long = "type")]
    room_type: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    capacity: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args)]
struct BookingFields {
    #[arg(long = "guest")]
    guest_id: Option<String>,
    #[arg(long = "room")]
    room_id: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    check_in: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    check_out: Option<String>,
    #[arg(long = "requests")]
    special_requests: Option<String>,
}

/// Command-line fields copied onto a form; absent flags keep the form's value.
trait FormFields {
    type Form: ResourceForm;

    fn apply(self, form: &mut Self::Form);
}

fn set(slot: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl FormFields for GuestFields {
    type Form = GuestForm;

    fn apply(self, form: &mut GuestForm) {
        set(&mut form.name, self.name);
        set(&mut form.email, self.email);
        set(&mut form.phone, self.phone);
        set(&mut form.address, self.address);
    }
}

impl FormFields for RoomFields {
    type Form = RoomForm;

    fn apply(self, form: &mut RoomForm) {
        set(&mut form.room_number, self.room_number);
        set(&mut form.room_type, self.room_type);
        set(&mut form.price, self.price);
        set(&mut form.capacity, self.capacity);
        set(&mut form.description, self.description);
    }
}

impl FormFields for BookingFields {
    type Form = BookingForm;

    fn apply(self, form: &mut BookingForm) {
        set(&mut form.guest_id, self.guest_id);
        set(&mut form.room_id, self.room_id);
        set(&mut form.check_in, self.check_in);
        set(&mut form.check_out, self.check_out);
        set(&mut form.special_requests, self.special_requests);
    }
}

enum Operation<F> {
    List,
    Show(EntityId),
    Create(F),
    Update(EntityId, F),
    Delete(EntityId),
}

macro_rules! operation_from {
    ($command:ty, $fields:ty) => {
        impl From<$command> for Operation<$fields> {
            fn from(command: $command) -> Self {
                type Command = $command;
                match command {
                    Command::List => Operation::List,
                    Command::Show { id } => Operation::Show(id.into()),
                    Command::Create(fields) => Operation::Create(fields),
                    Command::Update { id, fields } => Operation::Update(id.into(), fields),
                    Command::Delete { id } => Operation::Delete(id.into()),
                }
            }
        }
    };
}

operation_from!(GuestCommand, GuestFields);
operation_from!(RoomCommand, RoomFields);
operation_from!(BookingCommand, BookingFields);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing("warn").context("failed to initialise tracing")?;

    let mut config = load_config().context("failed to load configuration")?;
    if let Some(api_url) = cli.api_url {
        config.api.base_url = api_url;
    }
    if let Some(token_file) = cli.token_file {
        config.session.token_path = token_file;
    }
    let persistence = if cli.ephemeral {
        TokenPersistence::Ephemeral
    } else {
        TokenPersistence::File
    };

    let services = ClientServices::initialise(&config, persistence)
        .context("failed to initialise client services")?;

    match cli.command {
        Commands::Login { email, password } => login(&services, email, password).await,
        Commands::Register {
            name,
            email,
            password,
        } => register(&services, name, email, password).await,
        Commands::Logout => {
            services.auth.logout();
            println!("{}", "Signed out".green());
            Ok(())
        }
        Commands::Whoami => whoami(&services).await,
        Commands::Dashboard { date } => {
            dashboard(&services, date.unwrap_or_else(|| Local::now().date_naive())).await
        }
        Commands::Guests(command) => {
            require(&services, Route::Guests).await?;
            let mut screen = GuestsScreen::new(services.auth.clone());
            run_resource::<Guest, _>(&services, &mut screen, command.into()).await
        }
        Commands::Rooms(command) => {
            require(&services, Route::Rooms).await?;
            let mut screen = RoomsScreen::new(services.auth.clone());
            run_resource::<Room, _>(&services, &mut screen, command.into()).await
        }
        Commands::Bookings(command) => bookings(&services, command.into()).await,
    }
}

/// `value`, or one line read from stdin after printing `label`.
fn or_prompt(value: Option<String>, label: &str) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }

    eprint!("{label}: ");
    io::stderr().flush().context("failed to write prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .with_context(|| format!("failed to read {} from stdin", label.to_lowercase()))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Settle the route guard for `route`; anything but a render means the
/// stored session is missing or was rejected.
async fn require(services: &ClientServices, route: Route) -> Result<()> {
    match services.open(route).await {
        GuardDecision::Render(route) => {
            debug!(%route, "route allowed");
            Ok(())
        }
        GuardDecision::Redirect { .. } | GuardDecision::Loading => bail!(SIGNED_OUT),
    }
}

/// Turn the screen's failure state into an error for the shell.
fn failed(services: &ClientServices, notice: Option<&Notice>) -> anyhow::Error {
    if !services.auth.is_authenticated() {
        return anyhow!("Session expired. Run `frontdesk login` to sign in again.");
    }
    match notice {
        Some(notice) => anyhow!(notice.message.clone()),
        None => anyhow!("Request failed"),
    }
}

async fn login(
    services: &ClientServices,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let mut screen = LoginScreen::new(services.auth.clone());
    screen.email = or_prompt(email, "Email")?;
    screen.password = or_prompt(password, "Password")?;

    match screen.submit().await {
        Some(user) => {
            println!("Signed in as {}", user.display_name().green().bold());
            Ok(())
        }
        None => {
            render::field_errors(screen.field_errors());
            Err(screen
                .notice()
                .map(|notice| anyhow!(notice.message.clone()))
                .unwrap_or_else(|| anyhow!("Sign-in failed")))
        }
    }
}

async fn register(
    services: &ClientServices,
    name: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let mut screen = RegisterScreen::new(services.auth.clone());
    screen.name = name;
    screen.email = email;
    screen.password = or_prompt(password, "Password")?;

    match screen.submit().await {
        Some(notice) => {
            render::notice(Some(&notice));
            Ok(())
        }
        None => {
            render::field_errors(screen.field_errors());
            Err(screen
                .notice()
                .map(|notice| anyhow!(notice.message.clone()))
                .unwrap_or_else(|| anyhow!("Registration failed")))
        }
    }
}

async fn whoami(services: &ClientServices) -> Result<()> {
    require(services, Route::Dashboard).await?;
    let user = services.auth.current_user().ok_or_else(|| anyhow!(SIGNED_OUT))?;

    println!("{:>6}  {}", "Name".bold(), user.name.as_deref().unwrap_or("-"));
    println!("{:>6}  {}", "Email".bold(), user.email.as_deref().unwrap_or("-"));
    println!("{:>6}  {}", "Role".bold(), user.role.as_deref().unwrap_or("-"));
    println!("{:>6}  {}", "ID".bold(), user.id);
    Ok(())
}

async fn dashboard(services: &ClientServices, today: NaiveDate) -> Result<()> {
    require(services, Route::Dashboard).await?;

    let mut screen = DashboardScreen::new(services.auth.clone());
    if !screen.load(today).await {
        return Err(failed(services, screen.notice()));
    }
    match screen.stats() {
        Some(stats) => {
            println!("{}", format!("Front desk, {today}").bold());
            render::dashboard(stats);
            Ok(())
        }
        None => Err(failed(services, screen.notice())),
    }
}

async fn bookings(services: &ClientServices, operation: Operation<BookingFields>) -> Result<()> {
    require(services, Route::Bookings).await?;
    let mut screen = BookingsScreen::new(services.auth.clone());

    // Bookings can only point at existing guests and rooms.
    if let Operation::Create(fields) | Operation::Update(_, fields) = &operation {
        if fields.guest_id.is_some() || fields.room_id.is_some() {
            if !screen.load_choices().await {
                return Err(failed(services, screen.notice()));
            }
            if let Some(guest) = &fields.guest_id {
                if screen.guest_name(&EntityId::from(guest.as_str())).is_none() {
                    bail!("Unknown guest {guest}");
                }
            }
            if let Some(room) = &fields.room_id {
                if screen.room_number(&EntityId::from(room.as_str())).is_none() {
                    bail!("Unknown room {room}");
                }
            }
        }
    }

    run_resource::<Booking, _>(services, &mut *screen, operation).await
}

async fn run_resource<R, F>(
    services: &ClientServices,
    screen: &mut ResourceScreen<R>,
    operation: Operation<F>,
) -> Result<()>
where
    R: ScreenResource + Tabular,
    F: FormFields<Form = <R as ScreenResource>::Form>,
{
    match operation {
        Operation::List => {
            refresh(services, screen).await?;
            render::table(screen.items());
            Ok(())
        }
        Operation::Show(id) => {
            let item = show::<R>(services, &id).await?;
            render::details(&item);
            Ok(())
        }
        Operation::Create(fields) => {
            let mut form = <R as ScreenResource>::Form::default();
            fields.apply(&mut form);
            save(services, screen, &form).await
        }
        Operation::Update(id, fields) => {
            refresh(services, screen).await?;
            let Some(mut form) = screen.begin_edit(&id) else {
                return Err(failed(services, screen.notice()));
            };
            fields.apply(&mut form);
            save(services, screen, &form).await
        }
        Operation::Delete(id) => {
            refresh(services, screen).await?;
            if !screen.request_delete(&id) || !screen.confirm_delete().await {
                return Err(failed(services, screen.notice()));
            }
            render::notice(screen.notice());
            Ok(())
        }
    }
}

/// One record through its item endpoint.
async fn show<R: ScreenResource>(services: &ClientServices, id: &EntityId) -> Result<R> {
    match services.auth.client().fetch::<R>(id).await {
        Ok(item) => Ok(item),
        Err(error) if services.auth.handle_api_error(&error) => Err(failed(services, None)),
        Err(ApiError::NotFound { .. }) => {
            Err(anyhow!("No {} with ID {id}", R::LABEL.to_lowercase()))
        }
        Err(error) if error.is_transport() => Err(anyhow!(SERVER_UNREACHABLE)),
        Err(error) => Err(anyhow!(error.message().to_string())),
    }
}

async fn refresh<R: ScreenResource>(
    services: &ClientServices,
    screen: &mut ResourceScreen<R>,
) -> Result<()> {
    if screen.refresh().await {
        Ok(())
    } else {
        Err(failed(services, screen.notice()))
    }
}

async fn save<R: ScreenResource>(
    services: &ClientServices,
    screen: &mut ResourceScreen<R>,
    form: &<R as ScreenResource>::Form,
) -> Result<()> {
    if screen.submit(form).await {
        render::notice(screen.notice());
        return Ok(());
    }

    render::field_errors(screen.field_errors());
    if screen.notice().is_none() && !screen.field_errors().is_empty() {
        bail!("Please fix the fields above");
    }
    Err(failed(services, screen.notice()))
}
