//! Readers for the coordinates and demands files.
//!
//! The coordinates file starts with a header whose first token is the number
//! of clients, followed by one `x y` integer pair per line. The demands file
//! holds one record per line whose first token is the demand of that site.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::error::{MclpError, Result};
use crate::models::{total_demand, Site};

/// Parse a coordinates source into `(nb_clients, coordinates)`.
pub fn read_coordinates<R: BufRead>(reader: R, origin: &str) -> Result<(usize, Vec<(i64, i64)>)> {
    let mut lines = non_blank_lines(reader, origin)?.into_iter();

    let (header_line, header) = match lines.next() {
        Some(line) => line,
        None => return Err(MclpError::format(origin, "empty coordinates source")),
    };
    let count_token = header.split_whitespace().next().unwrap_or_default();
    let nb_clients: usize = count_token.parse().map_err(|_| {
        MclpError::format(
            origin,
            format!("line {}: client count '{}' is not an integer", header_line, count_token),
        )
    })?;
    if nb_clients == 0 {
        return Err(MclpError::format(origin, "instance declares no clients"));
    }

    let mut coordinates = Vec::with_capacity(nb_clients);
    for (number, text) in lines {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let pair = match tokens.as_slice() {
            [x, y] => x.parse::<i64>().ok().zip(y.parse::<i64>().ok()),
            _ => None,
        };
        match pair {
            Some(xy) => coordinates.push(xy),
            None => {
                return Err(MclpError::format(
                    origin,
                    format!("line {}: expected two integers, got '{}'", number, text.trim()),
                ))
            }
        }
    }

    if coordinates.len() != nb_clients {
        return Err(MclpError::format(
            origin,
            format!(
                "header declares {} clients but {} coordinate records follow",
                nb_clients,
                coordinates.len()
            ),
        ));
    }

    Ok((nb_clients, coordinates))
}

/// Parse a demands source, one non-negative integer per record.
pub fn read_demands<R: BufRead>(reader: R, origin: &str) -> Result<Vec<u64>> {
    let mut demands = Vec::new();
    for (number, text) in non_blank_lines(reader, origin)? {
        let token = text.split_whitespace().next().unwrap_or_default();
        let demand = token.parse::<u64>().map_err(|_| {
            MclpError::format(
                origin,
                format!("line {}: demand '{}' is not a non-negative integer", number, token),
            )
        })?;
        demands.push(demand);
    }
    Ok(demands)
}

/// Zip coordinates and demands into the canonical, 1-based site list.
pub fn sites_from_records(
    nb_clients: usize,
    coordinates: &[(i64, i64)],
    demands: &[u64],
    origin: &str,
) -> Result<Vec<Site>> {
    if coordinates.len() != nb_clients || demands.len() != nb_clients {
        return Err(MclpError::format(
            origin,
            format!(
                "{} clients declared, {} coordinate records, {} demand records",
                nb_clients,
                coordinates.len(),
                demands.len()
            ),
        ));
    }

    let sites: Vec<Site> = coordinates
        .iter()
        .zip(demands)
        .enumerate()
        .map(|(i, (&(x, y), &demand))| Site::new(i + 1, x, y, demand))
        .collect();
    if total_demand(&sites).is_none() {
        return Err(MclpError::format(origin, "total demand exceeds the u64 range"));
    }
    Ok(sites)
}

/// Load an instance from its coordinates and demands files.
pub fn load_sites(coordinates_path: &Path, demands_path: &Path) -> Result<Vec<Site>> {
    let coords_origin = coordinates_path.display().to_string();
    let demands_origin = demands_path.display().to_string();

    let (nb_clients, coordinates) = read_coordinates(open(coordinates_path)?, &coords_origin)?;
    let demands = read_demands(open(demands_path)?, &demands_origin)?;

    let origin = format!("{} / {}", coords_origin, demands_origin);
    let sites = sites_from_records(nb_clients, &coordinates, &demands, &origin)?;
    debug!("Loaded {} sites from {}", sites.len(), origin);
    Ok(sites)
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| MclpError::io(path, e))
}

/// Collects `(1-based line number, text)` for every line with content.
fn non_blank_lines<R: BufRead>(reader: R, origin: &str) -> Result<Vec<(usize, String)>> {
    let mut lines = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let text = line.map_err(|e| {
            MclpError::format(origin, format!("line {}: unreadable record ({})", i + 1, e))
        })?;
        if !text.trim().is_empty() {
            lines.push((i + 1, text));
        }
    }
    Ok(lines)
}
