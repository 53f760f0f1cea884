use crate::models::Snippet;
use anyhow::{Context, Result, bail};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Root element of a snippet package file.
pub const PACKAGE_ROOT: &str = "jcc-snippets-package";

/// Writes `snippets` as an XML package: a `jcc-snippets-package` root
/// with a `version` attribute and one `snippet` element per snippet,
/// whose children are `category`, `name`, zero-or-more `tag`, `syntax`,
/// `code` and `comment`, in that order.
pub fn export_snippets(path: &Path, snippets: &[Snippet]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = Writer::new_with_indent(BufWriter::new(file), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new(PACKAGE_ROOT);
    root.push_attribute(("version", env!("CARGO_PKG_VERSION")));
    writer.write_event(Event::Start(root))?;

    for snippet in snippets {
        write_snippet(&mut writer, snippet)?;
    }

    writer.write_event(Event::End(BytesEnd::new(PACKAGE_ROOT)))?;
    writer.into_inner().flush().context("Failed to flush package file")?;

    debug!("exported {} snippets to {}", snippets.len(), path.display());
    Ok(())
}

fn write_snippet<W: Write>(writer: &mut Writer<W>, snippet: &Snippet) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("snippet")))?;

    write_text_element(writer, "category", &snippet.category)?;
    write_text_element(writer, "name", &snippet.name)?;
    for tag in &snippet.tags {
        write_text_element(writer, "tag", tag)?;
    }
    write_text_element(writer, "syntax", &snippet.syntax)?;
    write_text_element(writer, "code", &snippet.code)?;
    write_text_element(writer, "comment", &snippet.comment)?;

    writer.write_event(Event::End(BytesEnd::new("snippet")))?;
    Ok(())
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    if !text.is_empty() {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Which child of a `snippet` element is currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Category,
    Name,
    Tag,
    Syntax,
    Code,
    Comment,
    Locked,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"category" => Some(Self::Category),
            b"name" => Some(Self::Name),
            b"tag" => Some(Self::Tag),
            b"syntax" => Some(Self::Syntax),
            b"code" => Some(Self::Code),
            b"comment" => Some(Self::Comment),
            b"locked" => Some(Self::Locked),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct PendingSnippet {
    category: String,
    name: String,
    tags: Vec<String>,
    code: String,
    comment: String,
    syntax: String,
    locked: bool,
}

impl PendingSnippet {
    fn take_text(&mut self, field: Field, text: &str) {
        let text = text.trim();
        match field {
            Field::Category => self.category.push_str(text),
            Field::Name => self.name.push_str(text),
            Field::Syntax => self.syntax.push_str(text),
            Field::Code => self.code.push_str(text),
            Field::Comment => self.comment.push_str(text),
            Field::Locked => self.locked = text.eq_ignore_ascii_case("true"),
            Field::Tag => {
                if let Some(last) = self.tags.last_mut() {
                    last.push_str(text);
                }
            }
        }
    }

    fn build(mut self) -> Snippet {
        self.tags.retain(|t| !t.is_empty());
        let mut snippet = Snippet::new(
            self.category,
            self.name,
            self.tags,
            self.code,
            self.comment,
            self.syntax,
        );
        snippet.locked = self.locked;
        snippet
    }
}

/// Reads a snippet package. All text is trimmed, any id carried by the
/// file is ignored, and the legacy variant that stores an extra `locked`
/// child (and no version attribute) is accepted; the flag is honored
/// when present and defaults to unlocked.
pub fn read_package(path: &Path) -> Result<Vec<Snippet>> {
    let mut reader = Reader::from_file(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut snippets = Vec::new();
    let mut pending: Option<PendingSnippet> = None;
    let mut field: Option<Field> = None;
    let mut saw_root = false;

    loop {
        match reader
            .read_event_into(&mut buf)
            .context("Failed to parse package file")?
        {
            Event::Start(e) => {
                let name = e.name();
                if !saw_root {
                    if name.as_ref() != PACKAGE_ROOT.as_bytes() {
                        bail!("not a snippet package: unexpected root element");
                    }
                    saw_root = true;
                } else if name.as_ref() == b"snippet" {
                    pending = Some(PendingSnippet::default());
                } else if pending.is_some() {
                    field = Field::from_name(name.as_ref());
                    if field == Some(Field::Tag) {
                        if let Some(p) = pending.as_mut() {
                            p.tags.push(String::new());
                        }
                    }
                }
            }
            // self-closing children (<comment/>) carry no text; the
            // pending fields already default to empty
            Event::Empty(_) => {}
            Event::Text(e) => {
                if let (Some(p), Some(f)) = (pending.as_mut(), field) {
                    let text = e.unescape().context("Malformed text in package file")?;
                    p.take_text(f, &text);
                }
            }
            Event::CData(e) => {
                if let (Some(p), Some(f)) = (pending.as_mut(), field) {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    p.take_text(f, &text);
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"snippet" {
                    if let Some(p) = pending.take() {
                        snippets.push(p.build());
                    }
                } else {
                    field = None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        bail!("not a snippet package: no root element");
    }

    debug!("read {} snippets from {}", snippets.len(), path.display());
    Ok(snippets)
}
