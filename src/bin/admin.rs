use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use lectern::{
    auth::AuthService,
    config::Settings,
    domain::{MaterialType, NewAnnouncement, NewMaterial, Role, MODULES},
    repository::Repositories,
};

/// Maintenance tasks for a Lectern deployment.
#[derive(Parser, Debug)]
#[command(name = "lectern-admin")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a staff passcode and print the hash to put in configuration
    IssuePasscode {
        /// `professor` or `class-representative`
        #[arg(long)]
        role: String,
        /// Use this passcode instead of a random one
        #[arg(long)]
        passcode: Option<String>,
    },
    /// Fill the configured record store with sample announcements, materials
    /// and subscribers
    Seed {
        #[arg(long = "subscriber")]
        subscribers: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::IssuePasscode { role, passcode } => {
            let role = match Role::from_str(&role) {
                Some(role) if role.can_edit() => role,
                _ => bail!("role must be professor or class-representative"),
            };
            let passcode = passcode.unwrap_or_else(|| AuthService::generate_passcode(role));
            let hash = AuthService::hash_passcode(&passcode)?;
            let key = match role {
                Role::Professor => "LECTERN__AUTH__PROFESSOR_PASSCODE_HASH",
                _ => "LECTERN__AUTH__CLASS_REP_PASSCODE_HASH",
            };

            println!("passcode: {}", passcode);
            println!("{}='{}'", key, hash);
        }
        Command::Seed { subscribers } => {
            let settings = Settings::new().unwrap_or_else(|e| {
                eprintln!("Failed to load config: {}. Using defaults.", e);
                Settings::default()
            });
            let repositories = Repositories::connect(&settings.database).await?;
            seed(&repositories, &subscribers).await?;
        }
    }

    Ok(())
}

async fn seed(repositories: &Repositories, subscribers: &[String]) -> Result<()> {
    let announcements = [
        NewAnnouncement {
            title: "Welcome to the course".to_string(),
            body: "Check the schedule and the Module 1 reading list before our first session.".to_string(),
            link: None,
            pinned: true,
        },
        NewAnnouncement {
            title: "Quiz 1 next week".to_string(),
            body: "Covers sampling distributions and the Central Limit Theorem.".to_string(),
            link: None,
            pinned: false,
        },
    ];

    for request in announcements {
        let announcement = repositories
            .announcements
            .create(request.validate()?.into_announcement())
            .await?;
        println!("created announcement {} '{}'", announcement.id, announcement.title);
    }

    let materials = [
        (MODULES[0].title, "Lecture 1 slides", MaterialType::Slides, "https://example.com/lecture-1.pptx"),
        (MODULES[1].title, "Hypothesis testing notes", MaterialType::Pdf, "https://example.com/hypothesis-testing.pdf"),
    ];

    for (module, title, material_type, url) in materials {
        let request = NewMaterial {
            title: title.to_string(),
            desc: String::new(),
            url: url.to_string(),
            material_type,
            module: module.to_string(),
        };
        let material = repositories
            .materials
            .create(request.validate(false)?.into_material())
            .await?;
        println!("created material {} '{}'", material.id, material.title);
    }

    for email in subscribers {
        let email = lectern::domain::normalize_email(email)?;
        repositories.subscribers.subscribe(&email).await?;
        println!("subscribed {}", email);
    }

    Ok(())
}
