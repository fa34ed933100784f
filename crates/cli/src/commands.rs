//! CLI commands

use anyhow::Result;
use clap::Subcommand;
use motordesk_client::ApiClient;
use motordesk_client::types::{
    FaultReport, Motor, MotorQuery, MotorStatus, NewMotor, NewUser, OutReport, OverhaulReport,
    TrialReport,
};

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and persist the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Forget the persisted session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Motor listing and lifecycle operations
    Motors {
        #[command(subcommand)]
        command: MotorCommands,
    },

    /// Operator accounts and roles
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
pub enum MotorCommands {
    /// List motors, optionally filtered
    List {
        /// Lifecycle status filter (In, Overhauling, Trial, Available, Fault, Out)
        #[arg(long)]
        status: Option<MotorStatus>,
        /// From date, DD-MM-YYYY
        #[arg(long)]
        from: Option<String>,
        /// To date, DD-MM-YYYY
        #[arg(long)]
        to: Option<String>,
    },

    /// Show one motor
    Show { id: String },

    /// Register a motor at intake
    In {
        #[arg(long)]
        serial_no: String,
        #[arg(long)]
        motor_id: String,
        #[arg(long)]
        kw: String,
        #[arg(long)]
        rpm: u32,
        #[arg(long)]
        frame: String,
        #[arg(long)]
        amp: String,
        #[arg(long)]
        voltage: String,
        #[arg(long)]
        mounting: String,
        #[arg(long)]
        make: String,
        #[arg(long)]
        bearing_de: String,
        #[arg(long)]
        bearing_nde: String,
        #[arg(long)]
        in_at_date: String,
        #[arg(long)]
        in_at_time: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        remark: Option<String>,
    },

    /// Move a motor to its next lifecycle status
    Move {
        id: String,
        #[command(subcommand)]
        to: MoveTarget,
    },

    /// Dashboard counters
    Analytics,
}

#[derive(Subcommand)]
pub enum MoveTarget {
    /// In -> Overhauling
    Overhauling,

    /// Overhauling -> Trial, recording the overhaul outcome
    Trial {
        #[arg(long)]
        remark: Option<String>,
        /// Repeatable; one replaced part per flag
        #[arg(long = "part")]
        parts: Vec<String>,
    },

    /// Trial -> Available, recording the electrical readings
    Available {
        #[arg(long)]
        motor_id: String,
        #[arg(long)]
        remark: Option<String>,
        #[arg(long)]
        resistance_ry: f64,
        #[arg(long)]
        resistance_yb: f64,
        #[arg(long)]
        resistance_rb: f64,
        #[arg(long)]
        ir_ph_to_ph: f64,
        #[arg(long)]
        ir_ph_to_e: f64,
    },

    /// Mark the motor faulty
    Fault {
        #[arg(long)]
        remark: Option<String>,
        #[arg(long)]
        eq_code: Option<String>,
        #[arg(long = "part")]
        parts: Vec<String>,
    },

    /// Available -> Out on installation
    Out {
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        condition: Option<String>,
        #[arg(long)]
        remark: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List operator accounts
    List,

    /// Create an operator account
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        display_name: String,
        #[arg(long)]
        role_id: String,
    },

    /// List assignable roles
    Roles,
}

impl Commands {
    pub async fn execute(self, client: ApiClient) -> Result<()> {
        match self {
            Self::Login { email, password } => {
                let user = client.login(&email, &password).await?;
                println!("logged in as {} <{}>", user.display_name, user.email);
            }
            Self::Logout => {
                client.logout().await?;
                println!("session cleared");
            }
            Self::Whoami => match client.session().await {
                Some(session) => println!(
                    "{} <{}> role={}",
                    session.user.display_name,
                    session.user.email,
                    session.user.role.as_deref().unwrap_or("-")
                ),
                None => println!("not logged in"),
            },
            Self::Motors { command } => command.execute(client).await?,
            Self::Users { command } => command.execute(client).await?,
        }
        Ok(())
    }
}

impl MotorCommands {
    pub async fn execute(self, client: ApiClient) -> Result<()> {
        match self {
            Self::List { status, from, to } => {
                let query = MotorQuery {
                    status,
                    from,
                    to,
                    ..MotorQuery::default()
                };
                let page = client.list_motors(&query).await?;
                for motor in &page.items {
                    print_motor_row(motor);
                }
                println!("{} of {} motors", page.items.len(), page.total);
            }
            Self::Show { id } => {
                let motor = client.get_motor(&id).await?;
                println!("{}", serde_json::to_string_pretty(&motor)?);
            }
            Self::In {
                serial_no,
                motor_id,
                kw,
                rpm,
                frame,
                amp,
                voltage,
                mounting,
                make,
                bearing_de,
                bearing_nde,
                in_at_date,
                in_at_time,
                location,
                remark,
            } => {
                let motor = NewMotor {
                    serial_no,
                    motor_id,
                    kw,
                    rpm,
                    frame,
                    amp,
                    voltage,
                    mounting,
                    make,
                    bearing_de,
                    bearing_nde,
                    in_at_date,
                    in_at_time,
                    location,
                    remark,
                };
                client.register_motor(&motor).await?;
                println!("motor {} registered (status In)", motor.serial_no);
            }
            Self::Move { id, to } => to.execute(client, &id).await?,
            Self::Analytics => {
                let analytics = client.analytics().await?;
                println!("{}", serde_json::to_string_pretty(&analytics)?);
            }
        }
        Ok(())
    }
}

impl MoveTarget {
    pub async fn execute(self, client: ApiClient, id: &str) -> Result<()> {
        match self {
            Self::Overhauling => {
                client.move_to_overhauling(id).await?;
                println!("motor {id} moved to Overhauling");
            }
            Self::Trial { remark, parts } => {
                let report = OverhaulReport {
                    remark,
                    parts: if parts.is_empty() { None } else { Some(parts) },
                };
                client.move_to_trial(id, &report).await?;
                println!("motor {id} moved to Trial");
            }
            Self::Available {
                motor_id,
                remark,
                resistance_ry,
                resistance_yb,
                resistance_rb,
                ir_ph_to_ph,
                ir_ph_to_e,
            } => {
                let report = TrialReport {
                    motor_id,
                    remark,
                    resistance_ry,
                    resistance_yb,
                    resistance_rb,
                    ir_ph_to_ph,
                    ir_ph_to_e,
                };
                client.move_to_available(id, &report).await?;
                println!("motor {id} moved to Available");
            }
            Self::Fault {
                remark,
                eq_code,
                parts,
            } => {
                let report = FaultReport {
                    remark,
                    eq_code,
                    parts: if parts.is_empty() { None } else { Some(parts) },
                };
                client.move_to_fault(id, &report).await?;
                println!("motor {id} moved to Fault");
            }
            Self::Out {
                location,
                condition,
                remark,
            } => {
                let report = OutReport {
                    location,
                    motor_condition: condition,
                    remark,
                };
                client.move_to_out(id, &report).await?;
                println!("motor {id} moved to Out");
            }
        }
        Ok(())
    }
}

impl UserCommands {
    pub async fn execute(self, client: ApiClient) -> Result<()> {
        match self {
            Self::List => {
                let users = client.list_users().await?;
                for user in &users {
                    println!(
                        "{:<24} {:<28} {}",
                        user.display_name,
                        user.email,
                        user.role.as_deref().unwrap_or("-")
                    );
                }
                println!("{} users", users.len());
            }
            Self::Add {
                email,
                phone,
                password,
                display_name,
                role_id,
            } => {
                let user = NewUser {
                    email,
                    phone,
                    password,
                    display_name,
                    role_id,
                };
                client.register_user(&user).await?;
                println!("user {} added", user.email);
            }
            Self::Roles => {
                let roles = client.list_roles().await?;
                for role in &roles {
                    println!(
                        "{:<12} {:<16} {}",
                        role.id,
                        role.role,
                        role.description.as_deref().unwrap_or("-")
                    );
                }
            }
        }
        Ok(())
    }
}

fn print_motor_row(motor: &Motor) {
    println!(
        "{:<12} {:<14} {:<14} {:<16} {}",
        motor.current_status.to_string(),
        motor.serial_no.as_deref().unwrap_or("-"),
        motor.motor_id.as_deref().unwrap_or("-"),
        motor.location.as_deref().unwrap_or("-"),
        motor.id
    );
}
