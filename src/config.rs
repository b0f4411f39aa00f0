use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_REQUEST: &str = "Look at ROAS drops and suggest better ads";

#[derive(Debug, Parser)]
#[command(name = "ads-decline-analyst")]
#[command(about = "Finds ROAS declines in ad campaign data, explains them, and drafts new ad copy", long_about = None)]
pub struct Cli {
    /// What you want to know; recorded with the results
    #[arg(default_value = DEFAULT_REQUEST)]
    pub request: String,

    /// Campaign performance table (delimited text)
    #[arg(long, env = "ADS_DATA_PATH", default_value = "synthetic_fb_ads_undergarments.csv")]
    pub data: PathBuf,

    /// Directory for insights.json, creatives.json and report.md
    #[arg(long, env = "ADS_OUTPUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Field delimiter of the data file
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Skip progress narration
    #[arg(long)]
    pub quiet: bool,
}

impl Cli {
    pub fn delimiter_byte(&self) -> anyhow::Result<u8> {
        if !self.delimiter.is_ascii() {
            anyhow::bail!(
                "delimiter {:?} must be a single ASCII character",
                self.delimiter
            );
        }
        Ok(self.delimiter as u8)
    }
}
