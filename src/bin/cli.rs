//! CLI for the gluster-block REST API

use clap::{Parser, Subcommand};
use gluster_block_rest::client::{BlockClient, Credentials};
use gluster_block_rest::server::command::{
    CreateBlockVolumeRequest, DeleteBlockVolumeRequest, ModifyBlockVolumeRequest,
};

#[derive(Parser)]
#[command(name = "gluster-block-rest")]
#[command(about = "Client for the gluster-block REST API")]
#[command(version)]
struct Cli {
    /// Server URL
    #[arg(long, default_value = "http://localhost:8081")]
    url: String,

    /// Token issuer (enables request signing together with --secret)
    #[arg(long, env = "GBREST_ISSUER")]
    issuer: Option<String>,

    /// Shared secret for the issuer
    #[arg(long, env = "GBREST_SECRET", hide_env_values = true)]
    secret: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the server is up
    Ping,

    /// Show the gluster-block version
    Version,

    /// List block volumes on a host volume
    List {
        hostvolume: String,
    },

    /// Show a block volume
    Info {
        hostvolume: String,
        blockname: String,
    },

    /// Create a block volume
    Create {
        hostvolume: String,
        blockname: String,

        /// Target hosts (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        hosts: Vec<String>,

        /// Size, e.g. 1GiB
        #[arg(long)]
        size: Option<String>,

        /// High-availability count
        #[arg(long)]
        ha: Option<u32>,

        /// Enable CHAP authentication
        #[arg(long)]
        auth: bool,

        /// Fully preallocate the backing file
        #[arg(long)]
        full_prealloc: bool,

        /// Existing backing file
        #[arg(long)]
        storage: Option<String>,

        /// Ring buffer size in MiB
        #[arg(long)]
        ring_buffer: Option<u32>,

        /// Block size in bytes
        #[arg(long)]
        block_size: Option<u32>,

        /// I/O timeout in seconds
        #[arg(long)]
        io_timeout: Option<u32>,
    },

    /// Delete a block volume
    Delete {
        hostvolume: String,
        blockname: String,

        /// Remove (true) or keep (false) the backing file
        #[arg(long)]
        unlink_storage: Option<bool>,

        #[arg(long)]
        force: bool,
    },

    /// Toggle authentication or resize a block volume
    Modify {
        hostvolume: String,
        blockname: String,

        /// Enable or disable authentication
        #[arg(long, conflicts_with = "size")]
        auth: Option<bool>,

        /// New size
        #[arg(long)]
        size: Option<String>,

        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let credentials = match (cli.issuer, cli.secret) {
        (Some(issuer), Some(secret)) => Some(Credentials { issuer, secret }),
        (None, None) => None,
        _ => anyhow::bail!("--issuer and --secret must be given together"),
    };
    let client = BlockClient::new(cli.url, credentials);

    let output = match cli.command {
        Commands::Ping => {
            client.ping().await?;
            println!("pong");
            return Ok(());
        }
        Commands::Version => client.version().await?,
        Commands::List { hostvolume } => client.list(&hostvolume).await?,
        Commands::Info {
            hostvolume,
            blockname,
        } => client.info(&hostvolume, &blockname).await?,
        Commands::Create {
            hostvolume,
            blockname,
            hosts,
            size,
            ha,
            auth,
            full_prealloc,
            storage,
            ring_buffer,
            block_size,
            io_timeout,
        } => {
            let req = CreateBlockVolumeRequest {
                hosts,
                size,
                ha,
                auth_enabled: auth,
                full_prealloc,
                storage,
                ring_buffer,
                block_size,
                io_timeout,
            };
            client.create(&hostvolume, &blockname, &req).await?
        }
        Commands::Delete {
            hostvolume,
            blockname,
            unlink_storage,
            force,
        } => {
            let req = DeleteBlockVolumeRequest {
                unlink_storage,
                force,
            };
            client.delete(&hostvolume, &blockname, &req).await?
        }
        Commands::Modify {
            hostvolume,
            blockname,
            auth,
            size,
            force,
        } => {
            let req = ModifyBlockVolumeRequest {
                auth_enabled: auth,
                size,
                force,
            };
            client.modify(&hostvolume, &blockname, &req).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
