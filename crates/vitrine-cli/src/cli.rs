use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vitrine",
    about = "Vitrine — local media gallery with albums, tags, and likes",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Gallery data directory (metadata document plus blob store).
    #[arg(long, global = true, default_value = ".vitrine")]
    pub root: String,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an account and sign in
    Signup(SignupArgs),
    /// Sign in with an existing account
    Login(LoginArgs),
    /// Sign in as a guest or provider account
    QuickLogin(QuickLoginArgs),
    /// Sign out
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Manage albums
    Album(AlbumArgs),
    /// Toggle the liked flag on a media item
    Like(LikeArgs),
    /// Export a media payload to a file
    Export(ExportArgs),
    /// Show gallery totals
    Stats,
    /// Move any remaining inline media payloads into the blob store
    Migrate,
    /// Switch the album list between grid and list presentation
    View(ViewArgs),
}

#[derive(Args)]
pub struct SignupArgs {
    pub email: String,
    pub password: String,
}

#[derive(Args)]
pub struct LoginArgs {
    pub email: String,
    pub password: String,
}

#[derive(Args)]
pub struct QuickLoginArgs {
    /// `guest`, `google`, or `apple`.
    #[arg(default_value = "guest")]
    pub provider: String,
}

#[derive(Args)]
pub struct AlbumArgs {
    #[command(subcommand)]
    pub action: AlbumAction,
}

#[derive(Subcommand)]
pub enum AlbumAction {
    /// Create an album, optionally uploading media files into it
    Create(AlbumCreateArgs),
    /// List albums, newest first
    List(AlbumListArgs),
    /// Show one album and bump its view counter
    Show(AlbumShowArgs),
    /// Update an album's name, description, or tags
    Edit(AlbumEditArgs),
    /// Delete an album and its media
    Delete(AlbumDeleteArgs),
}

#[derive(Args)]
pub struct AlbumCreateArgs {
    pub name: String,
    /// Comma-separated tags (at most 12 are kept).
    #[arg(short, long)]
    pub tags: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    /// Media files to upload (at most 36 are kept).
    #[arg(long = "media")]
    pub media: Vec<String>,
}

#[derive(Args)]
pub struct AlbumListArgs {
    /// Filter by name, tag, or description.
    #[arg(short, long)]
    pub query: Option<String>,
}

#[derive(Args)]
pub struct AlbumShowArgs {
    pub id: String,
}

#[derive(Args)]
pub struct AlbumEditArgs {
    pub id: String,
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(short, long)]
    pub tags: Option<String>,
}

#[derive(Args)]
pub struct AlbumDeleteArgs {
    pub id: String,
}

#[derive(Args)]
pub struct LikeArgs {
    pub album_id: String,
    pub media_id: String,
}

#[derive(Args)]
pub struct ExportArgs {
    pub media_id: String,
    /// Output path; defaults to the stored media name.
    #[arg(short, long)]
    pub out: Option<String>,
}

#[derive(Args)]
pub struct ViewArgs {
    /// `grid` or `list`.
    pub mode: String,
}
