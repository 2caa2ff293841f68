use std::path::PathBuf;

use clap::Parser;
use renderer::WaveCount;

#[derive(Parser, Debug)]
#[command(
    name = "tideline",
    author,
    version,
    about = "Tessellated Gerstner-wave ocean under a cubemap sky"
)]
pub struct Cli {
    /// Scene configuration file (defaults to scene.toml in the config directory)
    #[arg(long, value_name = "FILE", env = "TIDELINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Window size in pixels
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_dimensions)]
    pub size: Option<(u32, u32)>,

    /// Half the side length of the ocean patch, in world units
    #[arg(long, value_name = "UNITS", value_parser = parse_ocean_size)]
    pub ocean_size: Option<f32>,

    /// Number of Gerstner waves summed at start-up (1-4)
    #[arg(long, value_name = "COUNT", value_parser = parse_wave_count)]
    pub waves: Option<WaveCount>,

    /// Start in wireframe mode
    #[arg(long)]
    pub wireframe: bool,

    /// Directory the GLSL stage files are read from
    #[arg(long, value_name = "DIR")]
    pub shader_dir: Option<PathBuf>,

    /// Directory holding the six skybox face images
    #[arg(long, value_name = "DIR")]
    pub skybox_dir: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_dimensions(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| "invalid width in window size".to_string())?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| "invalid height in window size".to_string())?;
    if width == 0 || height == 0 {
        return Err("window dimensions must be greater than zero".into());
    }
    Ok((width, height))
}

pub fn parse_ocean_size(value: &str) -> Result<f32, String> {
    let size = value
        .trim()
        .parse::<f32>()
        .map_err(|_| format!("invalid ocean size '{value}'"))?;
    if !size.is_finite() || size <= 0.0 {
        return Err("ocean size must be a positive number".into());
    }
    Ok(size)
}

pub fn parse_wave_count(value: &str) -> Result<WaveCount, String> {
    let count = value
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid wave count '{value}'"))?;
    WaveCount::try_from(count).map_err(|err| err.to_string())
}
