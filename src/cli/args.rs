use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "grade-dash",
    version,
    about = "Serve an exam grade statistics dashboard"
)]
pub struct Cli {
    /// Grades file (.csv, .tsv or .json)
    #[arg(default_value = "notas_1u.csv")]
    pub data: PathBuf,

    /// Field separator for delimited input; overrides the config file
    #[arg(long)]
    pub delimiter: Option<char>,

    /// JSON file with column names, titles and labels
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    #[arg(long, default_value_t = 8050)]
    pub port: u16,

    /// Print the statistics table and exit instead of serving
    #[arg(long, default_value_t = false)]
    pub summary: bool,
}
