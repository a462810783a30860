//! Interface blocks carved out of running-configuration text.

const INTERFACE_KEYWORD: &str = "interface";
const TRUNK_MARKER: &str = "switchport mode trunk";

/// One `interface ...` stanza, borrowed from the configuration text it was
/// found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceBlock<'a> {
    header: &'a str,
    raw: &'a str,
}

impl<'a> InterfaceBlock<'a> {
    fn new(raw: &'a str) -> Self {
        let header = raw.lines().next().unwrap_or_default();
        Self {
            header: header.trim_end_matches('\r'),
            raw,
        }
    }

    /// First line of the block, including the `interface` keyword.
    pub fn header(&self) -> &'a str {
        self.header
    }

    /// Interface name with the leading keyword and whitespace removed.
    pub fn name(&self) -> &'a str {
        self.header
            .strip_prefix(INTERFACE_KEYWORD)
            .unwrap_or(self.header)
            .trim_start()
    }

    /// Block text from the header up to, not including, its terminator.
    pub fn raw_text(&self) -> &'a str {
        self.raw
    }

    pub fn is_trunk(&self) -> bool {
        self.raw.contains(TRUNK_MARKER)
    }
}

/// Split configuration text into interface blocks, in order of appearance.
///
/// A block opens on a line starting with the `interface` keyword at column 0
/// and closes before the next line that is only `!`, or at end of text. An
/// `interface` line inside an open block belongs to that block.
pub fn interface_blocks(config: &str) -> Vec<InterfaceBlock<'_>> {
    let mut blocks = Vec::new();
    let mut start: Option<usize> = None;
    let mut offset = 0;

    for line in config.split_inclusive('\n') {
        let body = line.trim_end_matches(['\n', '\r']);
        if start.is_none() && is_interface_header(body) {
            start = Some(offset);
        } else if body.trim() == "!" {
            if let Some(open) = start.take() {
                blocks.push(InterfaceBlock::new(&config[open..offset]));
            }
        }
        offset += line.len();
    }

    if let Some(open) = start {
        blocks.push(InterfaceBlock::new(&config[open..]));
    }
    blocks
}

fn is_interface_header(line: &str) -> bool {
    line.strip_prefix(INTERFACE_KEYWORD)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}
