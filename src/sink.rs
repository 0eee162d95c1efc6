//! Writing encoded output, raw or as a C header.
//!
//! The C header form embeds the stream as an `unsigned char` array:
//!
//! ```text
//! /* File generated automatically from templates.x; do not edit */
//!
//! #ifndef __WINE_TEMPLATES_H
//! #define __WINE_TEMPLATES_H
//!
//! unsigned char templates[] = {
//!   0x78, 0x6f, 0x66, 0x20, 0x30, 0x33, 0x30, 0x32, 0x62, 0x69, 0x6e, 0x20,
//!   0x30, 0x30, 0x36, 0x34,
//! };
//!
//! #define TEMPLATES_SIZE 16
//!
//! #endif /* __WINE_TEMPLATES_H */
//! ```

use crate::encoder::Encoded;
use crate::{Error, Result};
use std::io::Write;
use std::path::Path;

const BYTES_PER_LINE: usize = 12;
const GUARD_PREFIX: &str = "__WINE_";

/// Names used when rendering a C header.
#[derive(Clone, Debug)]
pub struct CHeader<'a> {
    /// Shown in the "generated from" banner.
    pub input_name: &'a str,
    /// The include guard is derived from its last path component.
    pub output_name: &'a str,
    pub var_name: &'a str,
    pub size_name: Option<&'a str>,
}

impl<'a> CHeader<'a> {
    /// Collects header names from an encoding result.
    ///
    /// # Errors
    ///
    /// Returns a configuration error, carrying the last input line, when no
    /// variable name was given by option or `#pragma xftmpl name`.
    pub fn for_encoded(
        encoded: &'a Encoded,
        input_name: &'a str,
        output_name: &'a str,
    ) -> Result<Self> {
        let var_name = encoded.directives.var_name.as_deref().ok_or_else(|| {
            Error::config_at(
                encoded.lines,
                "variable name must be specified with -i or #pragma name",
            )
        })?;
        Ok(CHeader {
            input_name,
            output_name,
            var_name,
            size_name: encoded.directives.size_name.as_deref(),
        })
    }

    /// Include guard suffix: the file name uppercased, with `.` turned into `_`.
    #[must_use]
    pub fn guard(&self) -> String {
        include_guard(self.output_name)
    }
}

/// Derives the include guard suffix from an output path.
///
/// # Examples
///
/// ```rust
/// use xftmpl::sink::include_guard;
///
/// assert_eq!(include_guard("out/d3dxof_templates.h"), "D3DXOF_TEMPLATES_H");
/// assert_eq!(include_guard("stdout"), "STDOUT");
/// ```
#[must_use]
pub fn include_guard(output_name: &str) -> String {
    let file_name = Path::new(output_name)
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| output_name.into());
    file_name
        .chars()
        .map(|c| if c == '.' { '_' } else { c.to_ascii_uppercase() })
        .collect()
}

/// Writes the stream byte for byte.
pub fn write_raw<W: Write>(mut writer: W, bytes: &[u8]) -> Result<()> {
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}

/// Writes the stream as a C header defining a byte array.
pub fn write_c_header<W: Write>(mut writer: W, bytes: &[u8], header: &CHeader<'_>) -> Result<()> {
    let guard = header.guard();
    write!(
        writer,
        "/* File generated automatically from {}; do not edit */\n\
         \n\
         #ifndef {prefix}{guard}\n\
         #define {prefix}{guard}\n\
         \n\
         unsigned char {}[] = {{",
        header.input_name,
        header.var_name,
        prefix = GUARD_PREFIX,
        guard = guard,
    )?;
    for (i, byte) in bytes.iter().enumerate() {
        if i % BYTES_PER_LINE == 0 {
            writer.write_all(b"\n ")?;
        }
        write!(writer, " 0x{:02x},", byte)?;
    }
    writer.write_all(b"\n};\n\n")?;
    if let Some(size_name) = header.size_name {
        writeln!(writer, "#define {} {}\n", size_name, bytes.len())?;
    }
    writeln!(writer, "#endif /* {}{} */", GUARD_PREFIX, guard)?;
    writer.flush()?;
    Ok(())
}

/// Parses the hex values back out of a header produced by [`write_c_header`].
///
/// Returns `None` if the array body is missing or malformed.
#[must_use]
pub fn parse_c_array(text: &str) -> Option<Vec<u8>> {
    let start = text.find("[] = {")? + "[] = {".len();
    let end = start + text[start..].find("};")?;
    text[start..end]
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| u8::from_str_radix(item.strip_prefix("0x")?, 16).ok())
        .collect()
}
