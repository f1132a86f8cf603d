use crate::align::structs::Alignment;

use anyhow::Context;

/// A column of the tabular output.
///
/// The header labels are derived from the variant names, so
/// `RowStart` is printed as "row start" over two header rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    RowName,
    ColName,
    RowStart,
    RowEnd,
    ColStart,
    ColEnd,
    Score,
    Length,
    Identities,
    Gaps,
}

pub const DEFAULT_COLUMNS: [Field; 10] = [
    Field::RowName,
    Field::ColName,
    Field::RowStart,
    Field::RowEnd,
    Field::ColStart,
    Field::ColEnd,
    Field::Score,
    Field::Length,
    Field::Identities,
    Field::Gaps,
];

impl Field {
    pub fn extract_from(&self, alignment: &Alignment) -> String {
        match self {
            Field::RowName => alignment.row_name.as_deref().unwrap_or("-").to_string(),
            Field::ColName => alignment.col_name.as_deref().unwrap_or("-").to_string(),
            Field::RowStart => alignment.row_start.to_string(),
            Field::RowEnd => alignment.row_end.to_string(),
            Field::ColStart => alignment.col_start.to_string(),
            Field::ColEnd => alignment.col_end.to_string(),
            Field::Score => alignment.score.to_string(),
            Field::Length => alignment.length.to_string(),
            Field::Identities => alignment.identities().to_string(),
            Field::Gaps => alignment.gaps().to_string(),
        }
    }
}

#[derive(Clone)]
pub struct TableFormat {
    pub fields: Vec<Field>,
    pub labels: Vec<Vec<String>>,
    pub widths: Vec<usize>,
}

impl TableFormat {
    pub fn new(fields: &[Field]) -> anyhow::Result<Self> {
        let first_field = fields.first().context("a table needs at least one field")?;

        let mut labels = vec![];
        let mut widths = vec![];

        // this regex matches CamelCaseWords
        let label_regex =
            regex::Regex::new(r"[A-Z][a-z]*").context("failed to build field label regex")?;

        // this closure extracts the words & minimum column width for a field
        let label_fn = |field: &Field| -> anyhow::Result<(Vec<String>, usize)> {
            // the Debug string for an enum produces the variant name
            let field_name = format!("{:?}", field);

            let (label_words, lengths): (Vec<_>, Vec<_>) = label_regex
                .find_iter(&field_name)
                .map(|m| (m.as_str().to_lowercase(), m.len()))
                .unzip();

            // the longest word sets the min width of the column
            let min_width = *lengths
                .iter()
                .max()
                .context("failed to produce max field label width")?;
            Ok((label_words, min_width))
        };

        // the first column needs room for the "# " prefix
        let (label_words, min_width) = label_fn(first_field)?;
        labels.push(label_words);
        widths.push(min_width + 2);

        for field in fields.iter().skip(1) {
            let (label_words, min_width) = label_fn(field)?;
            labels.push(label_words);
            widths.push(min_width);
        }

        Ok(Self {
            fields: fields.to_vec(),
            labels,
            widths,
        })
    }

    pub fn update_widths(&mut self, alignments: &[Alignment]) {
        for alignment in alignments {
            self.fields
                .iter()
                .zip(self.widths.iter_mut())
                .for_each(|(field, width)| {
                    *width = (*width).max(field.extract_from(alignment).len());
                });
        }
    }

    pub fn header(&self) -> anyhow::Result<String> {
        // the number of rows in the header is
        // the max number of words in a field
        let num_rows = self
            .labels
            .iter()
            .map(|l| l.len())
            .max()
            .context("field headers are empty")?;

        // one row per label word, plus the dashed underline
        let mut header_rows: Vec<String> = vec!["# ".to_string(); num_rows + 1];

        for (col_idx, (words, &width)) in self.labels.iter().zip(self.widths.iter()).enumerate() {
            // the first column gives up 2 to the "# " prefix
            let width = if col_idx == 0 { width - 2 } else { width };

            // labels with fewer words are bottom-aligned
            let offset = num_rows - words.len();
            for (row_idx, row) in header_rows.iter_mut().take(num_rows).enumerate() {
                let token = match row_idx.checked_sub(offset) {
                    Some(word_idx) => words[word_idx].as_str(),
                    None => "",
                };
                row.push_str(&format!("{token:width$} "));
            }
            header_rows[num_rows].push_str(&format!("{} ", "-".repeat(width)));
        }

        Ok(header_rows
            .iter()
            .map(|row| row.trim_end())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

impl Alignment {
    pub fn tab_string_formatted(&self, format: &TableFormat) -> String {
        let mut tab_string = String::new();

        format
            .fields
            .iter()
            .zip(format.widths.iter())
            .for_each(|(field, width)| {
                let val = field.extract_from(self);
                tab_string.push_str(&format!("{val:width$} "));
            });

        tab_string.trim_end().to_string()
    }
}
