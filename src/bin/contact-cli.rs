use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use contact_relay::config::MessengerConfig;
use contact_relay::form::{validate, NotificationMessage, SubmissionRequest};
use contact_relay::http::SubmissionError;

#[derive(Parser)]
#[command(name = "contact-cli")]
#[command(about = "Check or send contact-form submissions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate fields locally and print the message that would be relayed
    Check(Fields),
    /// Submit fields to a running server
    Send {
        #[arg(short, long, default_value = "http://localhost:8080/sendmessage")]
        url: String,

        #[command(flatten)]
        fields: Fields,
    },
}

#[derive(Args)]
struct Fields {
    #[arg(long, default_value = "")]
    name: String,

    #[arg(long, default_value = "")]
    phone: String,

    #[arg(long, default_value = "")]
    message: String,

    #[arg(long, default_value = "")]
    instrument: String,
}

impl Fields {
    fn pairs(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("name", self.name.as_str()),
            ("phone", self.phone.as_str()),
            ("message", self.message.as_str()),
            ("instrument", self.instrument.as_str()),
        ]
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check(fields) => {
            let submission: SubmissionRequest = fields.pairs().into_iter().collect();
            match validate(&submission) {
                Ok(valid) => {
                    let title = MessengerConfig::default().message_title;
                    println!("{}", NotificationMessage::from_submission(&valid, &title).text());
                }
                Err(rejection) => {
                    let err = SubmissionError::from(rejection);
                    eprintln!("{} {}", err.status().as_u16(), err.public_message());
                    std::process::exit(1);
                }
            }
        }
        Commands::Send { url, fields } => {
            let res = reqwest::Client::new()
                .post(&url)
                .form(&fields.pairs())
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;
    println!("{}", status);
    println!("{}", serde_json::to_string_pretty(&json)?);
    if !status.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
