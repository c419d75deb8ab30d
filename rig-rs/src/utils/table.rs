//! Table formatting utilities

use prettytable::{Cell, Row, Table};

/// Create a table with bold headers and no separators between rows
pub fn create_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_format(*prettytable::format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(
        headers
            .iter()
            .map(|h| Cell::new(h).style_spec("b"))
            .collect(),
    ));
    table
}

/// Add a row to a table; numeric-looking cells are right-aligned
pub fn add_table_row<I, S>(table: &mut Table, cells: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let row_cells = cells
        .into_iter()
        .map(|s| {
            let text = s.as_ref();
            let cell = Cell::new(text);
            if text.parse::<f64>().is_ok() {
                cell.style_spec("r")
            } else {
                cell
            }
        })
        .collect();
    table.add_row(Row::new(row_cells));
}

/// Two-column property table for `info` commands
pub fn property_table(properties: &[(&str, String)]) -> Table {
    let mut table = create_table(&["Property", "Value"]);
    for (name, value) in properties {
        table.add_row(Row::new(vec![Cell::new(name), Cell::new(value)]));
    }
    table
}
