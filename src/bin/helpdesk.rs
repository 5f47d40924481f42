use anyhow::{Context, Error};
use helpdesk_client::{
    endpoints::{self, TicketFilter, TicketUpdate},
    require_login, Config, Gateway, Navigator, Role, Ticket, TicketStatus,
    User,
};
use std::path::PathBuf;
use structopt::StructOpt;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Args::from_args();

    log::debug!("Starting application with {:#?}", args);

    let gateway = args.config.gateway()?;

    if args.command.needs_login() {
        require_login(gateway.session(), &Terminal);
    }

    run(&gateway, args.command).await
}

async fn run(gateway: &Gateway, command: Command) -> Result<(), Error> {
    match command {
        Command::Login { email, password } => {
            let response = endpoints::login(gateway, &email, &password).await?;
            println!("Logged in as {}", describe(&response.user));
        },
        Command::Logout => endpoints::logout(gateway)?,
        Command::Whoami => match gateway.session().user::<User>() {
            Some(user) => println!("{}", describe(&user)),
            None => println!("Not logged in"),
        },
        Command::Register {
            name,
            email,
            password,
            role,
        } => {
            let registration =
                endpoints::register(gateway, &name, &email, &password, role)
                    .await?;
            println!(
                "Created user {} {} ({})",
                registration.id, registration.email, registration.role
            );
        },
        Command::Users { role } => {
            for user in endpoints::list_users(gateway, role).await? {
                println!("{:>4} {}", user.id, describe(&user));
            }
        },
        Command::Tickets { status, mine, html } => {
            let filter = TicketFilter { status, mine };
            let tickets = endpoints::list_tickets(gateway, filter).await?;

            if html {
                println!("<ul>");
                for ticket in &tickets {
                    println!(
                        "  <li>#{} {} {}</li>",
                        ticket.id,
                        ticket.title,
                        ticket.status.badge()
                    );
                }
                println!("</ul>");
            } else {
                for ticket in &tickets {
                    print_ticket(ticket);
                }
            }
        },
        Command::Show { id } => {
            let detail = endpoints::get_ticket(gateway, id).await?;
            print_ticket(&detail.ticket);
            println!("\n{}\n", detail.ticket.description);

            for comment in &detail.comments {
                let author = comment
                    .user
                    .as_ref()
                    .map(|u| u.name.clone())
                    .unwrap_or_else(|| format!("user {}", comment.user_id));
                println!("[{}] {}: {}", comment.created_at, author, comment.content);
            }
            for attachment in &detail.attachments {
                println!("attachment {}: {}", attachment.id, attachment.filename);
            }
        },
        Command::Create { title, description } => {
            let ticket =
                endpoints::create_ticket(gateway, &title, &description).await?;
            print_ticket(&ticket);
        },
        Command::Update {
            id,
            status,
            assignee,
        } => {
            let update = TicketUpdate {
                status,
                assignee_id: assignee,
            };
            let ticket = endpoints::update_ticket(gateway, id, update).await?;
            print_ticket(&ticket);
        },
        Command::Assign { id, assignee } => {
            let ticket = endpoints::assign_ticket(gateway, id, assignee).await?;
            print_ticket(&ticket);
        },
        Command::Comments { id } => {
            for comment in endpoints::list_comments(gateway, id).await? {
                println!("[{}] user {}: {}", comment.created_at, comment.user_id, comment.content);
            }
        },
        Command::Comment { id, content } => {
            let comment = endpoints::add_comment(gateway, id, &content).await?;
            println!("Added comment {} to ticket #{}", comment.id, comment.ticket_id);
        },
        Command::Upload { id, file } => {
            let contents = std::fs::read(&file).with_context(|| {
                format!("Unable to read \"{}\"", file.display())
            })?;
            let filename = file
                .file_name()
                .and_then(|name| name.to_str())
                .context("The file needs a UTF-8 name")?;

            let attachment =
                endpoints::upload_attachment(gateway, id, filename, contents)
                    .await?;
            println!("Uploaded {} as attachment {}", attachment.filename, attachment.id);
        },
        Command::Download { id, output } => {
            let contents = endpoints::download_attachment(gateway, id).await?;
            std::fs::write(&output, &contents).with_context(|| {
                format!("Unable to write \"{}\"", output.display())
            })?;
            println!("Saved {} bytes to {}", contents.len(), output.display());
        },
    }

    Ok(())
}

fn describe(user: &User) -> String {
    format!("{} <{}> ({})", user.name, user.email, user.role)
}

fn print_ticket(ticket: &Ticket) {
    let assignee = match ticket.assignee_id {
        Some(id) => format!("assignee {}", id),
        None => String::from("unassigned"),
    };

    println!(
        "#{} {} [{}] by user {} -> {}",
        ticket.id, ticket.title, ticket.status, ticket.creator_id, assignee
    );
}

/// A terminal can't navigate anywhere, so "going to the login page" means
/// telling the user to log in and bailing.
struct Terminal;

impl Navigator for Terminal {
    fn navigate(&self, location: &str) {
        log::debug!("Redirect to {} requested", location);
        eprintln!("You need to log in first (try `helpdesk login`)");
        std::process::exit(2);
    }
}

#[derive(Debug, StructOpt)]
#[structopt(about = "Work with the Smart Campus help desk")]
struct Args {
    #[structopt(flatten)]
    config: Config,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    #[structopt(about = "Log in and remember the session")]
    Login {
        #[structopt(short = "e", long = "email", help = "Your email address")]
        email: String,
        #[structopt(short = "p", long = "password", help = "Your password")]
        password: String,
    },
    #[structopt(about = "Forget the stored session")]
    Logout,
    #[structopt(about = "Show who is logged in")]
    Whoami,
    #[structopt(about = "Create a new account")]
    Register {
        #[structopt(long = "name")]
        name: String,
        #[structopt(long = "email")]
        email: String,
        #[structopt(long = "password")]
        password: String,
        #[structopt(long = "role", default_value = "STUDENT")]
        role: Role,
    },
    #[structopt(about = "List accounts")]
    Users {
        #[structopt(long = "role")]
        role: Option<Role>,
    },
    #[structopt(about = "List tickets")]
    Tickets {
        #[structopt(long = "status", help = "OPEN, IN_PROGRESS or RESOLVED")]
        status: Option<TicketStatus>,
        #[structopt(long = "mine", help = "Only tickets you created")]
        mine: bool,
        #[structopt(long = "html", help = "Print an HTML list with badges")]
        html: bool,
    },
    #[structopt(about = "Show a ticket with its comments and attachments")]
    Show { id: u64 },
    #[structopt(about = "Open a new ticket")]
    Create {
        #[structopt(long = "title")]
        title: String,
        #[structopt(long = "description")]
        description: String,
    },
    #[structopt(about = "Change a ticket's status or assignee")]
    Update {
        id: u64,
        #[structopt(long = "status")]
        status: Option<TicketStatus>,
        #[structopt(long = "assignee")]
        assignee: Option<u64>,
    },
    #[structopt(about = "Assign a ticket to someone")]
    Assign { id: u64, assignee: u64 },
    #[structopt(about = "List a ticket's comments")]
    Comments { id: u64 },
    #[structopt(about = "Comment on a ticket")]
    Comment { id: u64, content: String },
    #[structopt(about = "Attach a file to a ticket")]
    Upload {
        id: u64,
        #[structopt(parse(from_os_str))]
        file: PathBuf,
    },
    #[structopt(about = "Download an attachment")]
    Download {
        id: u64,
        #[structopt(short = "o", long = "output", parse(from_os_str))]
        output: PathBuf,
    },
}

impl Command {
    fn needs_login(&self) -> bool {
        !matches!(
            self,
            Command::Login { .. }
                | Command::Logout
                | Command::Whoami
                | Command::Register { .. }
        )
    }
}
