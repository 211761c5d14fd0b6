use std::io::BufRead;

use crate::api::scenario_dto::NodeRecordDto;
use crate::error::{Error, Result};

const NEIGHBOR_PREFIXES: [&str; 4] = ["tunnels lead to valves ", "tunnel leads to valve ", "tunnels lead to valve ", "tunnel leads to valves "];

/// Reads line-oriented node records of the form
///
/// ```text
/// Valve AA has flow rate=0; tunnels lead to valves DD, II, BB
/// Valve HH has flow rate=22; tunnel leads to valve GG
/// ```
///
/// Blank lines are skipped. Line numbers in errors are 1-based.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<NodeRecordDto>> {
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        records.push(parse_record(trimmed).map_err(|reason| Error::RecordParse { line: index + 1, reason })?);
    }

    log::debug!("Read {} node records.", records.len());
    Ok(records)
}

pub fn read_records_from_str(input: &str) -> Result<Vec<NodeRecordDto>> {
    read_records(input.as_bytes())
}

fn parse_record(line: &str) -> std::result::Result<NodeRecordDto, String> {
    let rest = line.strip_prefix("Valve ").ok_or_else(|| "expected line to start with 'Valve '".to_string())?;

    let (id, rest) = rest.split_once(" has flow rate=").ok_or_else(|| "missing ' has flow rate='".to_string())?;
    let id = parse_id(id)?;

    let (rate, tail) = rest.split_once(';').ok_or_else(|| "missing ';' after flow rate".to_string())?;
    let reward_rate = rate.trim().parse::<u64>().map_err(|e| format!("invalid flow rate '{}': {}", rate.trim(), e))?;

    let tail = tail.trim_start();
    let list = NEIGHBOR_PREFIXES
        .iter()
        .find_map(|prefix| tail.strip_prefix(prefix))
        .ok_or_else(|| format!("unrecognised neighbor clause '{}'", tail))?;

    let neighbors = list.split(',').map(parse_id).collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(NodeRecordDto { id, reward_rate, neighbors })
}

fn parse_id(raw: &str) -> std::result::Result<String, String> {
    let id = raw.trim();
    if id.is_empty() || id.chars().any(char::is_whitespace) {
        return Err(format!("invalid node id '{}'", raw));
    }
    Ok(id.to_string())
}
