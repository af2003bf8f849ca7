// Primitives for reading CSV files.

use std::fs::File;

use crate::tideman::{
    io_common::{assemble_choices, make_default_id},
    *,
};

/// Reads one ballot per row. The cells starting at the first vote column are
/// the names of the candidates, from the most preferred to the least preferred.
pub fn read_csv_ranking(path: String, cfs: &FileSource) -> TidemanResult<Vec<ParsedBallot>> {
    let default_id = make_default_id(&path);

    let id_idx_o = cfs.id_column_index_int()?;
    let choices_start_col = cfs.first_vote_column_index()?;

    let mut res: Vec<ParsedBallot> = Vec::new();
    let (records, row_offset) = get_records(&path, cfs)?;

    for (idx, line_r) in records.enumerate() {
        let lineno = idx + row_offset + 1;
        debug!("{:?} {:?}", lineno, line_r);
        let line = line_r.context(CsvLineParseSnafu {})?;
        let id = if let Some(id_idx) = id_idx_o {
            line.get(id_idx)
                .context(CsvLineTooShortSnafu { lineno })?
                .to_string()
        } else {
            default_id(lineno)
        };

        if line.len() <= choices_start_col {
            return Err(TidemanError::CsvLineTooShort { lineno });
        }
        let choices = assemble_choices(line.iter().skip(choices_start_col));
        debug!(
            "read_csv_ranking: lineno: {:?} row: {:?}",
            lineno, &choices
        );

        res.push(ParsedBallot {
            id: Some(id),
            choices,
        });
    }
    Ok(res)
}

fn get_records(
    path: &String,
    cfs: &FileSource,
) -> TidemanResult<(csv::StringRecordsIntoIter<File>, usize)> {
    let first_row = cfs.first_vote_row_index()?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path: path.clone() })?;
    let mut records = rdr.into_records();
    // Skip the rows before the first ballot (headers, comments).
    for _ in 0..first_row {
        _ = records.next();
    }
    Ok((records, first_row))
}
