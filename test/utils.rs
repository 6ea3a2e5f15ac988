use std::fmt::{self, Write as _};

struct Bytes<'a>(pub &'a [u8]);

impl fmt::Display for Bytes<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i != 0 {
                fmt.write_char(' ')?;
            }
            write!(fmt, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Makes trailing and tab whitespace visible.
struct Escape<'a>(pub &'a str);

impl fmt::Display for Escape<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let trimmed = self.0.trim_end();
        for c in trimmed.chars() {
            match c {
                '\t' => fmt.write_char('→')?,
                _ => fmt.write_char(c)?,
            }
        }
        for _ in self.0[trimmed.len()..].chars() {
            fmt.write_char('•')?;
        }
        Ok(())
    }
}

pub struct Diff<'a> {
    file: &'a str,
    line: usize,
    bytes: &'a [u8],
    expect: &'a str,
    result: &'a str,
}

impl<'a> Diff<'a> {
    pub fn new(
        file: &'a str,
        line: usize,
        bytes: &'a [u8],
        expect: &'a str,
        result: &'a str,
    ) -> Self {
        Self {
            file,
            line,
            bytes,
            expect,
            result,
        }
    }
}

impl fmt::Display for Diff<'_> {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        use diff::Result as E;
        let w = 5;
        if !self.file.is_empty() {
            writeln!(out, "{:w$}--> {}:{}", ' ', self.file, self.line)?;
        }
        if !self.bytes.is_empty() {
            writeln!(out, "{:>8}{}", "raw | ", Bytes(self.bytes))?;
            writeln!(out, "{:7}{:-<24}", ' ', ' ')?;
        }
        for diff in diff::lines(self.expect, self.result) {
            match diff {
                E::Left(l) => writeln!(out, "{:w$} - {}", ' ', Escape(l))?,
                E::Both(l, _) => writeln!(out, "{:w$} | {}", ' ', Escape(l))?,
                E::Right(r) => writeln!(out, "{:w$} + {}", ' ', Escape(r))?,
            }
        }
        Ok(())
    }
}

/// Compare two multi-line outputs, printing a diff on mismatch.
pub fn check(file: &str, line: usize, left: &str, right: &str) -> Result<(), String> {
    if left != right {
        let err = "invalid result";
        eprintln!("error: {err}");
        eprintln!("{}", Diff::new(file, line, &[], left, right));
        return Err(err.to_string());
    }
    Ok(())
}
