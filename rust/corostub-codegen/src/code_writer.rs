//! Indentation-tracking writer shared by every target.
//!
//! Generated sources are assembled from fragments: each sub-artifact of a
//! service (descriptors, handlers, dispatch branches...) is written into its
//! own buffer during the single pass over the methods, then spliced into the
//! enclosing declaration with [`CodeWriter::write_fragment`], which re-indents
//! every line to the writer's current level.
//!
//! ```
//! use corostub_codegen::code_writer::CodeWriter;
//! use corostub_codegen::cw_writeln;
//!
//! let mut output = String::new();
//! let mut w = CodeWriter::with_indent_spaces(&mut output, 2);
//!
//! w.block("object EchoGrpcKt", |w| {
//!     cw_writeln!(w, "const val SERVICE_NAME = \"{}\"", "test.Echo")
//! })
//! .unwrap();
//!
//! assert_eq!(output, "object EchoGrpcKt {\n  const val SERVICE_NAME = \"test.Echo\"\n}\n");
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// A writer that tracks indentation for brace-delimited languages.
pub struct CodeWriter<W> {
    writer: W,
    indent_level: Rc<Cell<usize>>,
    indent_string: String,
    at_line_start: bool,
}

impl<W: fmt::Write> CodeWriter<W> {
    pub fn new(writer: W, indent_string: String) -> Self {
        Self {
            writer,
            indent_level: Rc::new(Cell::new(0)),
            indent_string,
            at_line_start: true,
        }
    }

    pub fn with_indent_spaces(writer: W, spaces: usize) -> Self {
        Self::new(writer, " ".repeat(spaces))
    }

    /// Write text without a newline, indenting first if at line start.
    pub fn write(&mut self, text: &str) -> fmt::Result {
        if text.is_empty() {
            return Ok(());
        }

        if self.at_line_start && !text.trim().is_empty() {
            for _ in 0..self.indent_level.get() {
                self.writer.write_str(&self.indent_string)?;
            }
            self.at_line_start = false;
        }

        self.writer.write_str(text)
    }

    pub fn writeln(&mut self, text: &str) -> fmt::Result {
        self.write(text)?;
        self.writer.write_char('\n')?;
        self.at_line_start = true;
        Ok(())
    }

    pub fn blank_line(&mut self) -> fmt::Result {
        self.writer.write_char('\n')?;
        self.at_line_start = true;
        Ok(())
    }

    /// Indentation increases while the returned guard is alive.
    pub fn indent(&mut self) -> IndentGuard {
        self.indent_level.set(self.indent_level.get() + 1);
        IndentGuard {
            indent_level: Rc::clone(&self.indent_level),
        }
    }

    /// Write `prefix line` for each line of `text`.
    pub fn doc_comment(&mut self, prefix: &str, text: &str) -> fmt::Result {
        for line in text.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                self.writeln(prefix)?;
            } else {
                self.writeln(&format!("{prefix} {line}"))?;
            }
        }
        Ok(())
    }

    /// Write a `/** ... */` block in the grpc-java style, with the text
    /// wrapped in `<pre>` so proto comments keep their line breaks.
    ///
    /// A `*/` inside the text is written as `*&#47;` so it cannot close the
    /// comment early.
    pub fn kdoc_pre(&mut self, text: &str) -> fmt::Result {
        self.writeln("/**")?;
        self.writeln(" * <pre>")?;
        self.doc_comment(" *", &text.replace("*/", "*&#47;"))?;
        self.writeln(" * </pre>")?;
        self.writeln(" */")
    }

    /// Write `header {`, the body one level deeper, then `}`.
    pub fn block<F>(&mut self, header: &str, body: F) -> fmt::Result
    where
        F: FnOnce(&mut Self) -> fmt::Result,
    {
        self.writeln(&format!("{header} {{"))?;
        {
            let _indent = self.indent();
            body(self)?;
        }
        self.writeln("}")
    }

    /// Splice pre-rendered text at the current indentation.
    ///
    /// Relative indentation inside the fragment is kept; empty lines stay
    /// empty instead of receiving trailing whitespace.
    pub fn write_fragment(&mut self, fragment: &str) -> fmt::Result {
        for line in fragment.lines() {
            if line.trim().is_empty() {
                self.blank_line()?;
            } else {
                self.writeln(line)?;
            }
        }
        Ok(())
    }

    /// Use [`cw_write!`](crate::cw_write) instead of calling this directly.
    #[doc(hidden)]
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        let formatted = args.to_string();
        self.write(&formatted)
    }

    /// Use [`cw_writeln!`](crate::cw_writeln) instead of calling this directly.
    #[doc(hidden)]
    pub fn writeln_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        let formatted = args.to_string();
        self.writeln(&formatted)
    }
}

/// RAII guard returned by [`CodeWriter::indent`].
pub struct IndentGuard {
    indent_level: Rc<Cell<usize>>,
}

impl Drop for IndentGuard {
    fn drop(&mut self) {
        let current = self.indent_level.get();
        self.indent_level.set(current.saturating_sub(1));
    }
}

/// `write!` for a [`CodeWriter`].
#[macro_export]
macro_rules! cw_write {
    ($writer:expr, $($arg:tt)*) => {
        $writer.write_fmt(format_args!($($arg)*))
    };
}

/// `writeln!` for a [`CodeWriter`].
#[macro_export]
macro_rules! cw_writeln {
    ($writer:expr, $($arg:tt)*) => {
        $writer.writeln_fmt(format_args!($($arg)*))
    };
}
