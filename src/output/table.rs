use std::borrow::Cow;

use crate::catalog::Resource;

/// Width floor: narrower requests still get the full fixed columns.
pub const MIN_WIDTH: usize = 80;

const NAME_WIDTH: usize = 25;
const CPUS_WIDTH: usize = 4;
const MEMORY_WIDTH: usize = 8;
const WALL_TIME_WIDTH: usize = 11;

/// Columns between the five fields.
const SEPARATORS: usize = 4;

/// Hard-clip a string to `max_len` chars.
fn clip(s: &str, max_len: usize) -> Cow<'_, str> {
    if s.chars().count() <= max_len {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.chars().take(max_len).collect())
    }
}

pub struct TableFormatter;

impl TableFormatter {
    /// Render the resource table: header always present, body rows
    /// blank-line-separated. Name/CPUs/Memory/MaxWallTime get fixed
    /// widths; AllowedVOs takes whatever remains of `width`.
    pub fn format(resources: &[Resource], width: usize) -> String {
        let width = width.max(MIN_WIDTH);
        let vos_width = width - NAME_WIDTH - CPUS_WIDTH - MEMORY_WIDTH - WALL_TIME_WIDTH - SEPARATORS;

        let mut lines = Vec::with_capacity(resources.len() + 1);
        lines.push(Self::row(
            "Name",
            "CPUs",
            "Memory",
            "MaxWallTime",
            "AllowedVOs",
            vos_width,
        ));

        for resource in resources {
            let wall_time = resource
                .max_wall_time()
                .map(|minutes| minutes.to_string())
                .unwrap_or_default();
            lines.push(Self::row(
                resource.name(),
                &resource.cpus().to_string(),
                &resource.memory().to_string(),
                &wall_time,
                &resource.allowed_vos().join(", "),
                vos_width,
            ));
        }

        lines.join("\n\n")
    }

    fn row(name: &str, cpus: &str, memory: &str, wall_time: &str, vos: &str, vos_width: usize) -> String {
        format!(
            "{:<name_w$} {:>cpus_w$} {:>mem_w$} {:>wall_w$} {:<vos_w$}",
            clip(name, NAME_WIDTH),
            cpus,
            memory,
            wall_time,
            clip(vos, vos_width),
            name_w = NAME_WIDTH,
            cpus_w = CPUS_WIDTH,
            mem_w = MEMORY_WIDTH,
            wall_w = WALL_TIME_WIDTH,
            vos_w = vos_width,
        )
    }
}
