use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "orblens",
    author,
    version,
    about = "Draggable metaball orb with a magnifying lens, rendered on wgpu"
)]
pub struct Cli {
    /// Window width in logical pixels.
    #[arg(long, default_value_t = 420)]
    pub width: u32,

    /// Window height in logical pixels.
    #[arg(long, default_value_t = 760)]
    pub height: u32,

    /// Number of content pages in the carousel.
    #[arg(long, default_value_t = 5)]
    pub pages: usize,

    /// Skip the launch choreography (orb reveal delay, hints, scripted drag).
    #[arg(long)]
    pub skip_onboarding: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
