use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::extract::SelectedSite;
use crate::error::{MclpError, Result};

/// Write the selected facilities in the fixed CVRP-style interchange layout.
pub fn write_selected_sites<W: Write>(mut writer: W, selected: &[SelectedSite]) -> std::io::Result<()> {
    writeln!(writer, "NAME : .")?;
    writeln!(writer, "COMMENT: .")?;
    writeln!(writer, "TYPE : CVRP")?;
    writeln!(writer, "DIMENSION : {}", selected.len())?;
    writeln!(writer, "EDGE_WEIGHT_TYPE : EUC_2D")?;
    writeln!(writer, "CAPACITY : uncapacitated")?;
    writeln!(writer, "NODE_COORD_SECTION")?;
    for site in selected {
        writeln!(writer, "{} {} {}", site.index, site.x, site.y)?;
    }
    writeln!(writer, "DEMAND_SECTION")?;
    for site in selected {
        writeln!(writer, "{} {}", site.index, site.demand)?;
    }
    writeln!(writer, "DEPOT_SECTION")?;
    writeln!(writer, "EOF")?;
    writer.flush()
}

pub fn write_selected_sites_file(path: &Path, selected: &[SelectedSite]) -> Result<()> {
    let file = File::create(path).map_err(|e| MclpError::io(path, e))?;
    write_selected_sites(BufWriter::new(file), selected).map_err(|e| MclpError::io(path, e))
}
