/// Insertion anchors of the most recently pushed residue fragment, as absolute
/// byte offsets into the output buffer.
#[derive(Debug, Clone, Copy)]
struct FragmentMarks {
    body_end: usize,             // End of the residue body, before any terminal tail
    branch_open: Option<usize>,  // Last '(' inside the body
    branch_close: Option<usize>, // Last ')' inside the body
}

impl FragmentMarks {
    fn shift_from(&mut self, position: usize, by: usize) {
        let shift = |p: &mut usize| {
            if *p >= position {
                *p += by;
            }
        };
        shift(&mut self.body_end);
        if let Some(p) = self.branch_open.as_mut() {
            shift(p);
        }
        if let Some(p) = self.branch_close.as_mut() {
            shift(p);
        }
    }
}

/// Incremental SPICES writer.
///
/// Remembers where the current fragment's open branch and body end are, so that
/// ring-closure and disulfide-bond markers can be placed without searching the
/// text that has already been written.
#[derive(Debug, Default)]
pub struct SpicesBuilder {
    buffer: String,
    current: Option<FragmentMarks>,
}

impl SpicesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a residue fragment. The last `tail_len` bytes of `fragment` are a
    /// terminal particle link (e.g. `-Ct`) that markers must not be placed after.
    pub fn push_fragment(&mut self, fragment: &str, tail_len: usize) {
        let start = self.buffer.len();
        let body_len = fragment.len().saturating_sub(tail_len);
        let body = &fragment[..body_len];
        self.current = Some(FragmentMarks {
            body_end: start + body_len,
            branch_open: body.rfind('(').map(|i| start + i),
            branch_close: body.rfind(')').map(|i| start + i),
        });
        self.buffer.push_str(fragment);
    }

    pub fn push_link(&mut self) {
        self.buffer.push('-');
    }

    pub fn push_line_break(&mut self) {
        self.buffer.push('\n');
    }

    pub fn has_fragment(&self) -> bool {
        self.current.is_some()
    }

    /// Marks the current backbone particle as ring-closing with `[index]`.
    ///
    /// Returns `false` if no fragment has been pushed yet.
    pub fn insert_ring_closure(&mut self, index: u32) -> bool {
        match self.current {
            Some(marks) => {
                self.insert_marker(marks.branch_open.unwrap_or(marks.body_end), index);
                true
            }
            None => false,
        }
    }

    /// Marks the last side chain particle of the current fragment with `[index]`.
    ///
    /// Returns `false` if no fragment has been pushed yet.
    pub fn insert_bond(&mut self, index: u32) -> bool {
        match self.current {
            Some(marks) => {
                self.insert_marker(marks.branch_close.unwrap_or(marks.body_end), index);
                true
            }
            None => false,
        }
    }

    fn insert_marker(&mut self, position: usize, index: u32) {
        let marker = format!("[{}]", index);
        self.buffer.insert_str(position, &marker);
        if let Some(marks) = self.current.as_mut() {
            marks.shift_from(position, marker.len());
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}
