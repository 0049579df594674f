use anyhow::Context;
use api_shared::pb;
use clap::{Args, Parser, Subcommand};

mod client;
mod error;
mod validation;

use client::PatientsClient;
use validation::{today, validate_documento, validate_patient, PatientFields};

#[derive(Parser)]
#[command(name = "pacientes")]
#[command(about = "Pacientes patient record CLI")]
struct Cli {
    /// gRPC server URL
    #[arg(long, env = "PACIENTES_URL", default_value = "http://127.0.0.1:50051")]
    url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the server is reachable
    Health,
    /// List all patients
    List,
    /// Show one patient
    Get {
        /// Patient id
        id: i64,
    },
    /// Register a new patient
    Create(PatientArgs),
    /// Overwrite every field of a patient
    Update {
        /// Patient id
        id: i64,
        #[command(flatten)]
        patient: PatientArgs,
    },
    /// Delete the first patient with this documento
    Delete {
        /// Identity document number
        documento: String,
    },
}

#[derive(Args)]
struct PatientArgs {
    #[arg(long)]
    nombre: String,
    #[arg(long)]
    apellido: String,
    /// Identity document number
    #[arg(long)]
    documento: String,
    #[arg(long, allow_negative_numbers = true)]
    edad: i64,
    /// M, F or O
    #[arg(long)]
    sexo: String,
    #[arg(long)]
    telefono: Option<String>,
    #[arg(long)]
    direccion: Option<String>,
    /// Registration date, YYYY-MM-DD
    #[arg(long)]
    fecha_registro: Option<String>,
}

impl From<PatientArgs> for PatientFields {
    fn from(args: PatientArgs) -> Self {
        Self {
            nombre: args.nombre,
            apellido: args.apellido,
            documento: args.documento,
            edad: args.edad,
            sexo: args.sexo,
            telefono: args.telefono,
            direccion: args.direccion,
            fecha_registro: args.fecha_registro,
        }
    }
}

fn print_patient(patient: &pb::Patient) {
    println!(
        "ID: {}, Name: {} {}, Documento: {}, Edad: {}, Sexo: {}, Telefono: {}, Direccion: {}, Registered: {}",
        patient.id,
        patient.nombre,
        patient.apellido,
        patient.documento,
        patient.edad,
        patient.sexo,
        patient.telefono,
        patient.direccion,
        patient.fecha_registro
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'pacientes --help' for commands");
        return Ok(());
    };

    let api_key = std::env::var("API_KEY").context("API_KEY must be set")?;
    let mut client = PatientsClient::connect(cli.url, &api_key).await?;

    match command {
        Commands::Health => {
            let res = client.health().await?;
            println!("{}", res.message);
        }
        Commands::List => {
            let patients = client.list().await?;
            if patients.is_empty() {
                println!("No patients found.");
            } else {
                patients.iter().for_each(print_patient);
            }
        }
        Commands::Get { id } => match client.get(id).await? {
            Some(patient) => print_patient(&patient),
            None => println!("No patient with ID {}", id),
        },
        Commands::Create(args) => {
            let fecha = today(chrono::Local::now().date_naive());
            let patient = validate_patient(args.into(), &fecha)?;
            let id = client.create(patient.into_create()).await?;
            println!("Created patient with ID: {}", id);
        }
        Commands::Update { id, patient } => {
            let existing = client
                .get(id)
                .await?
                .with_context(|| format!("No patient with ID {}", id))?;
            let patient = validate_patient(patient.into(), &existing.fecha_registro)?;
            if client.update(patient.into_update(id)).await? {
                println!("Updated patient {}", id);
            } else {
                anyhow::bail!("Patient {} was not updated", id);
            }
        }
        Commands::Delete { documento } => {
            let documento = validate_documento(&documento)?;
            if client.delete(documento.clone()).await? {
                println!("Deleted patient with documento {}", documento);
            } else {
                anyhow::bail!("No patient deleted for documento {}", documento);
            }
        }
    }

    Ok(())
}
