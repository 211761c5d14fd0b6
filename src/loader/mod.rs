pub mod parser;
pub mod record_reader;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use crate::api::scenario_dto::{NodeRecordDto, ScenarioDto};
use crate::error::{Error, Result};

/// On-disk representation of the node records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Records,
}

impl InputFormat {
    /// `.json` files are JSON scenarios, everything else is read as records.
    pub fn from_path(file_path: &str) -> InputFormat {
        match Path::new(file_path).extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Records,
        }
    }
}

impl FromStr for InputFormat {
    type Err = Error;

    fn from_str(format: &str) -> Result<InputFormat> {
        match format.to_ascii_lowercase().as_str() {
            "json" => Ok(InputFormat::Json),
            "records" | "text" => Ok(InputFormat::Records),
            _ => Err(Error::InvalidConfig(format!("unknown input format '{}'", format))),
        }
    }
}

/// Node records plus the entry id the input names, if any.
#[derive(Debug)]
pub struct Scenario {
    pub entry: Option<String>,
    pub records: Vec<NodeRecordDto>,
}

pub fn load_scenario(file_path: &str, format: InputFormat) -> Result<Scenario> {
    log::info!("Loading scenario from '{}' ({:?}).", file_path, format);

    match format {
        InputFormat::Json => {
            let dto: ScenarioDto = parser::parse_json_file(file_path)?;
            Ok(Scenario { entry: dto.entry, records: dto.nodes })
        }
        InputFormat::Records => {
            let file = File::open(file_path)?;
            let records = record_reader::read_records(BufReader::new(file))?;
            Ok(Scenario { entry: None, records })
        }
    }
}
