// webvh CLI - publish and resolve did:webvh attested resources

mod keystore;
mod options;

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;
use url::Url;
use webvh_crypto::{verify_attested_resource, verifying_key_for, AttestedResource, Keyring};
use webvh_registry::{setup, AnonCredsSchema, RegistrationOptions, RegistryConfig};

/// webvh - did:webvh Attested Resource Tool
#[derive(Parser)]
#[command(name = "webvh")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    endpoints: Endpoints,

    #[command(subcommand)]
    command: Commands,
}

/// Registry endpoints. Fall back to WEBVH_REGISTRAR_URL / WEBVH_RESOLVER_URL.
#[derive(Args)]
struct Endpoints {
    /// Registrar base URL
    #[arg(long, global = true)]
    registrar: Option<String>,

    /// Resolver base URL
    #[arg(long, global = true)]
    resolver: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage identity (init, show)
    Identity {
        #[command(subcommand)]
        action: IdentityAction,
    },
    /// Register and fetch AnonCreds schemas
    Schema {
        #[command(subcommand)]
        action: SchemaAction,
    },
    /// Resolve and verify attested resources
    Resource {
        #[command(subcommand)]
        action: ResourceAction,
    },
}

#[derive(Subcommand)]
enum IdentityAction {
    /// Initialize a new signing identity
    Init {
        /// did:webvh identifier resources are published under
        #[arg(long)]
        issuer: String,

        /// Key fragment in the issuer's DID document (defaults to a did:key method)
        #[arg(long)]
        key_id: Option<String>,

        /// Force overwrite existing identity
        #[arg(short, long)]
        force: bool,
    },
    /// Show current identity
    Show,
}

#[derive(Subcommand)]
enum SchemaAction {
    /// Sign and publish a schema
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        version: String,

        /// Attribute names (repeatable, or comma separated)
        #[arg(short, long = "attr", value_name = "NAME", required = true)]
        attrs: Vec<String>,

        /// Proof option overrides (can be specified multiple times)
        #[arg(long = "proof", value_name = "KEY=VALUE")]
        proof: Vec<String>,

        /// Print the full registration result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch a schema by id
    Get {
        schema_id: String,
    },
}

#[derive(Subcommand)]
enum ResourceAction {
    /// Print a resolved resource as JSON
    Resolve {
        resource_id: String,
    },
    /// Verify the proofs of a resource (an id, or a path to a JSON file)
    Verify {
        target: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Identity { action } => handle_identity(action),
        Commands::Schema { action } => handle_schema(action, &cli.endpoints).await,
        Commands::Resource { action } => handle_resource(action, &cli.endpoints).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// What a command needs from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// Resolves only; a resolver URL alone is enough.
    Read,
    /// Publishes; needs a registrar URL.
    Write,
}

fn load_config(endpoints: &Endpoints, access: Access) -> anyhow::Result<RegistryConfig> {
    config_from(endpoints, access, |key| std::env::var(key).ok())
}

/// Builds the registry configuration from flags, falling back to `lookup`.
fn config_from<F>(endpoints: &Endpoints, access: Access, lookup: F) -> anyhow::Result<RegistryConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| {
        let flag = match key {
            "WEBVH_REGISTRAR_URL" => endpoints.registrar.clone(),
            "WEBVH_RESOLVER_URL" => endpoints.resolver.clone(),
            _ => None,
        };
        flag.or_else(|| lookup(key)).filter(|v| !v.trim().is_empty())
    };

    if access == Access::Read && lookup("WEBVH_REGISTRAR_URL").is_none() {
        if let Some(resolver) = lookup("WEBVH_RESOLVER_URL") {
            // reads never reach the registrar
            let read_only = |key: &str| match key {
                "WEBVH_REGISTRAR_URL" => Some(resolver.clone()),
                _ => lookup(key),
            };
            return RegistryConfig::from_lookup(read_only).context("Invalid resolver configuration");
        }
    }

    RegistryConfig::from_lookup(lookup).context(match access {
        Access::Read => "Pass --resolver or --registrar, or set WEBVH_RESOLVER_URL or WEBVH_REGISTRAR_URL",
        Access::Write => "Pass --registrar or set WEBVH_REGISTRAR_URL",
    })
}

fn parse_url(raw: &str) -> anyhow::Result<Url> {
    Url::parse(raw).map_err(|e| anyhow!("Invalid URL '{}': {}", raw, e))
}

fn handle_identity(action: IdentityAction) -> anyhow::Result<()> {
    match action {
        IdentityAction::Init { issuer, key_id, force } => {
            let dir = keystore::identity_dir()?;
            let passphrase = keystore::prompt_new_passphrase()?;
            let info = keystore::init_identity_at(&dir, &issuer, key_id.as_deref(), &passphrase, force)?;

            println!("{} Identity initialized", "✓".green().bold());
            println!();
            println!("  Issuer:              {}", info.issuer_id);
            println!("  Verification method: {}", truncate_did(&info.verification_method));
            println!("  Public key:          {}", info.public_key_multibase);
            println!();
            println!("Your identity files are stored in {}", dir.display());
            if key_id.is_some() {
                println!(
                    "{}",
                    "Add the public key to the issuer's DID document before publishing.".yellow()
                );
            }
            println!("Keep your passphrase safe - it cannot be recovered!");
            Ok(())
        }
        IdentityAction::Show => {
            let info = keystore::load_identity_info()?;
            println!("  Issuer:              {}", info.issuer_id);
            println!("  Verification method: {}", info.verification_method);
            println!("  Public key:          {}", info.public_key_multibase);
            println!("  Created:             {}", info.created_at.to_rfc3339());
            Ok(())
        }
    }
}

async fn handle_schema(action: SchemaAction, endpoints: &Endpoints) -> anyhow::Result<()> {
    match action {
        SchemaAction::Register {
            name,
            version,
            attrs,
            proof,
            json,
        } => {
            let config = load_config(endpoints, Access::Write)?;
            let identity = keystore::load_identity_info()?;

            let attr_names = options::parse_attr_names(&attrs);
            if attr_names.is_empty() {
                return Err(anyhow!("At least one --attr is required"));
            }

            let registration_options = RegistrationOptions {
                proof_options: options::parse_proof_options(&proof)?,
                ..RegistrationOptions::with_verification_method(identity.verification_method.clone())
            };

            let passphrase = keystore::prompt_passphrase()?;
            let signing_key = keystore::load_signing_key(&passphrase)?;
            let keys = Keyring::new().with_key(identity.verification_method.clone(), signing_key);
            let registry = setup(config, keys)?;

            let schema = AnonCredsSchema {
                issuer_id: identity.issuer_id.clone(),
                attr_names,
                name,
                version,
            };
            let result = registry.register_schema(&schema, &registration_options).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            println!("{} Schema registered", "✓".green().bold());
            println!();
            println!("  Schema id: {}", result.schema_id().cyan());
            println!("  Issuer:    {}", schema.issuer_id);
            println!("  Digest:    {}", result.registration_metadata.resource_id);
            Ok(())
        }
        SchemaAction::Get { schema_id } => {
            let registry = setup(load_config(endpoints, Access::Read)?, Keyring::new())?;
            let result = registry.get_schema(&schema_id).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}

async fn handle_resource(action: ResourceAction, endpoints: &Endpoints) -> anyhow::Result<()> {
    match action {
        ResourceAction::Resolve { resource_id } => {
            let registry = setup(load_config(endpoints, Access::Read)?, Keyring::new())?;
            let resource = registry.resolve(&resource_id).await?;
            println!("{}", serde_json::to_string_pretty(&resource)?);
            Ok(())
        }
        ResourceAction::Verify { target } => {
            let resource = load_resource(&target, endpoints).await?;
            handle_verify(&resource)
        }
    }
}

async fn load_resource(target: &str, endpoints: &Endpoints) -> anyhow::Result<AttestedResource> {
    let path = std::path::Path::new(target);
    if path.is_file() {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read '{}': {}", target, e))?;
        return serde_json::from_str(&content).map_err(|e| anyhow!("Failed to parse '{}': {}", target, e));
    }

    let registry = setup(load_config(endpoints, Access::Read)?, Keyring::new())?;
    Ok(registry.resolve(target).await?)
}

fn handle_verify(resource: &AttestedResource) -> anyhow::Result<()> {
    match verify_attested_resource(resource, verifying_key_for) {
        Ok(()) => {
            println!("{} {}", "✓".green().bold(), "Proofs verified".green());
            println!();

            let local = keystore::load_identity_info().ok();
            println!("  Resource: {}", resource.id);
            for proof in &resource.proof {
                let indicator = match &local {
                    Some(info) if info.verification_method == proof.verification_method => {
                        "(Local Identity)".cyan().to_string()
                    }
                    Some(_) => "(External Identity)".yellow().to_string(),
                    None => "(No local identity)".dimmed().to_string(),
                };
                println!("  Signer:   {} {}", truncate_did(&proof.verification_method), indicator);
                if let Some(created) = &proof.created {
                    println!("  Created:  {}", created);
                }
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), "Verification failed".red());
            eprintln!();
            eprintln!("  Resource: {}", resource.id);
            Err(e.into())
        }
    }
}

/// Truncates a DID for readability: "did:key:z6Mk...last8chars"
fn truncate_did(did: &str) -> String {
    if did.chars().count() <= 30 {
        return did.to_string();
    }
    let chars: Vec<char> = did.chars().collect();
    let prefix: String = chars[..20].iter().collect();
    let suffix: String = chars[chars.len() - 8..].iter().collect();
    format!("{}...{}", prefix, suffix)
}
