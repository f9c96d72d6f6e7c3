use clap::Subcommand;

use crate::auth::password::hash_password;
use crate::cli::{utils::Report, OutputFormat};
use crate::config::AppConfig;
use crate::database::service::{self, NewUser};
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user")]
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, help = "Grant write access to the API")]
        superuser: bool,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long, default_value = "")]
        email: String,
    },

    #[command(about = "Change a user's password")]
    SetPassword {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

pub async fn handle(cmd: UserCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect_and_migrate(&config.database).await?;

    match cmd {
        UserCommands::Create {
            username,
            password,
            superuser,
            first_name,
            last_name,
            email,
        } => {
            if username.trim().is_empty() || password.is_empty() {
                anyhow::bail!("username and password must not be empty");
            }

            let user = service::create_user(
                &pool,
                NewUser {
                    username: username.trim().to_string(),
                    password_hash: hash_password(&password, None).await?,
                    first_name,
                    last_name,
                    email,
                    is_superuser: superuser,
                },
            )
            .await?;

            Report::new(format!("Created user '{}'", user.username))
                .detail("id", user.id.to_string())
                .detail("is_superuser", user.is_superuser)
                .print(&output_format)
        }
        UserCommands::SetPassword { username, password } => {
            if password.is_empty() {
                anyhow::bail!("password must not be empty");
            }

            let password_hash = hash_password(&password, None).await?;
            service::set_user_password(&pool, &username, &password_hash).await?;

            Report::new(format!("Password changed for '{}'", username)).print(&output_format)
        }
    }
}
