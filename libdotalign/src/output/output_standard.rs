use crate::align::structs::Alignment;

use anyhow::Result;
use std::io::Write;

pub fn write_standard_output(alignments: &[Alignment], out: &mut impl Write) -> Result<()> {
    for alignment in alignments {
        writeln!(out, "{}", &alignment.ali_string())?
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::structs::{AlignedPair, AlignmentBuilder, Cursor, TraceStep};
    use assert2::{check, let_assert};

    #[test]
    fn test_write_standard_output() {
        let mut builder = AlignmentBuilder::new(Cursor::new(1, 1), 2)
            .with_row_name("r")
            .with_col_name("c");
        builder.push(
            Cursor::new(1, 1),
            TraceStep::Diagonal,
            AlignedPair {
                row_byte: b'A',
                col_byte: b'A',
            },
        );
        let alignment = builder.build();

        let mut out: Vec<u8> = vec![];
        let_assert!(Ok(()) = write_standard_output(&[alignment.clone(), alignment], &mut out));
        let_assert!(Ok(text) = String::from_utf8(out));

        check!(text.matches("==  score: 2").count() == 2);
        check!(text.lines().nth(1) == Some("r     1 A 1    "));
    }
}
