//! ESC/POS command encoder
//!
//! Fixed command constants, validated parameterised commands and a fluent
//! builder used to compose receipts. Everything here is pure: no I/O.

use crate::error::{PrintError, PrintResult};

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;
const LF: u8 = 0x0A;

/// ESC @ - reset printer state
pub const INITIALIZE: &[u8] = &[ESC, b'@'];
/// ESC a 0
pub const ALIGN_LEFT: &[u8] = &[ESC, b'a', 0x00];
/// ESC a 1
pub const ALIGN_CENTER: &[u8] = &[ESC, b'a', 0x01];
/// ESC a 2
pub const ALIGN_RIGHT: &[u8] = &[ESC, b'a', 0x02];
/// ESC E 1
pub const BOLD_ON: &[u8] = &[ESC, b'E', 0x01];
/// ESC E 0
pub const BOLD_OFF: &[u8] = &[ESC, b'E', 0x00];
/// GS ! 0x11 - double width and height
pub const DOUBLE_SIZE_ON: &[u8] = &[GS, b'!', 0x11];
/// GS ! 0
pub const DOUBLE_SIZE_OFF: &[u8] = &[GS, b'!', 0x00];
/// GS V 66 0 - full cut, printer manages the cutter-to-head distance
pub const FULL_CUT: &[u8] = &[GS, b'V', 0x42, 0x00];

/// Default drawer pulse on-time (ms units as understood by the printer)
pub const DEFAULT_DRAWER_ON_MS: i64 = 25;
/// Default drawer pulse off-time
pub const DEFAULT_DRAWER_OFF_MS: i64 = 250;

/// Lines fed after the receipt body, before the cut
pub const RECEIPT_TRAILING_FEED: u8 = 3;

pub fn initialize() -> &'static [u8] {
    INITIALIZE
}

pub fn align_left() -> &'static [u8] {
    ALIGN_LEFT
}

pub fn align_center() -> &'static [u8] {
    ALIGN_CENTER
}

pub fn align_right() -> &'static [u8] {
    ALIGN_RIGHT
}

pub fn bold_on() -> &'static [u8] {
    BOLD_ON
}

pub fn bold_off() -> &'static [u8] {
    BOLD_OFF
}

pub fn double_size_on() -> &'static [u8] {
    DOUBLE_SIZE_ON
}

pub fn double_size_off() -> &'static [u8] {
    DOUBLE_SIZE_OFF
}

pub fn cut() -> &'static [u8] {
    FULL_CUT
}

/// Feed `lines` lines.
///
/// Encoded as two bytes: the escape prefix followed by the line count as a
/// single byte. Counts outside `0..=255` are rejected, never truncated.
pub fn feed(lines: i64) -> PrintResult<[u8; 2]> {
    let n = u8::try_from(lines)
        .map_err(|_| PrintError::invalid(format!("feed lines must be in 0..=255, got {lines}")))?;
    Ok(feed_bytes(n))
}

fn feed_bytes(lines: u8) -> [u8; 2] {
    [ESC, lines]
}

/// ESC p m t1 t2 - pulse the drawer connector `pin`
pub fn open_drawer(pin: i64, on_ms: i64, off_ms: i64) -> PrintResult<[u8; 5]> {
    Ok(DrawerCommand::new(pin, on_ms, off_ms)?.to_bytes())
}

/// UTF-8 text payload, passed through without escaping
pub fn text(s: &str) -> &[u8] {
    s.as_bytes()
}

/// Validated drawer kick parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawerCommand {
    pin: u8,
    on_ms: u8,
    off_ms: u8,
}

impl DrawerCommand {
    /// Pin must be 0 (connector pin 2) or 1 (connector pin 5); both pulse
    /// durations must fit in a byte.
    pub fn new(pin: i64, on_ms: i64, off_ms: i64) -> PrintResult<Self> {
        if !(0..=1).contains(&pin) {
            return Err(PrintError::invalid(format!("drawer pin must be 0 or 1, got {pin}")));
        }
        let on_ms = u8::try_from(on_ms)
            .map_err(|_| PrintError::invalid(format!("t1 must be in 0..=255, got {on_ms}")))?;
        let off_ms = u8::try_from(off_ms)
            .map_err(|_| PrintError::invalid(format!("t2 must be in 0..=255, got {off_ms}")))?;

        Ok(Self {
            pin: pin as u8,
            on_ms,
            off_ms,
        })
    }

    /// Default pulse timings on the given pin
    pub fn with_pin(pin: i64) -> PrintResult<Self> {
        Self::new(pin, DEFAULT_DRAWER_ON_MS, DEFAULT_DRAWER_OFF_MS)
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn on_ms(&self) -> u8 {
        self.on_ms
    }

    pub fn off_ms(&self) -> u8 {
        self.off_ms
    }

    pub fn to_bytes(&self) -> [u8; 5] {
        [ESC, b'p', self.pin, self.on_ms, self.off_ms]
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    fn command(self) -> &'static [u8] {
        match self {
            Alignment::Left => ALIGN_LEFT,
            Alignment::Center => ALIGN_CENTER,
            Alignment::Right => ALIGN_RIGHT,
        }
    }
}

/// ESC/POS command builder
///
/// Accumulates an ESC/POS byte stream. Text is written as UTF-8.
pub struct EscPosBuilder {
    buf: Vec<u8>,
}

impl EscPosBuilder {
    /// Start a new stream; the printer is initialized first (ESC @)
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(256);
        buf.extend_from_slice(INITIALIZE);
        Self { buf }
    }

    // === Text Output ===

    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(text(s));
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.newline()
    }

    pub fn newline(&mut self) -> &mut Self {
        self.buf.push(LF);
        self
    }

    pub fn feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&feed_bytes(lines));
        self
    }

    // === Alignment ===

    pub fn align(&mut self, alignment: Alignment) -> &mut Self {
        self.buf.extend_from_slice(alignment.command());
        self
    }

    pub fn center(&mut self) -> &mut Self {
        self.align(Alignment::Center)
    }

    pub fn left(&mut self) -> &mut Self {
        self.align(Alignment::Left)
    }

    pub fn right(&mut self) -> &mut Self {
        self.align(Alignment::Right)
    }

    // === Text Style ===

    pub fn bold(&mut self) -> &mut Self {
        self.buf.extend_from_slice(BOLD_ON);
        self
    }

    pub fn bold_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(BOLD_OFF);
        self
    }

    pub fn double_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(DOUBLE_SIZE_ON);
        self
    }

    pub fn reset_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(DOUBLE_SIZE_OFF);
        self
    }

    // === Paper Control ===

    pub fn cut(&mut self) -> &mut Self {
        self.buf.extend_from_slice(FULL_CUT);
        self
    }

    // === Cash Drawer ===

    pub fn open_drawer(&mut self, cmd: DrawerCommand) -> &mut Self {
        self.buf.extend_from_slice(&cmd.to_bytes());
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Receipt composition
// ============================================================================

/// Formatting applied around the receipt body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptOptions {
    pub alignment: Alignment,
    pub bold: bool,
    pub double_size: bool,
    /// Centred bold banner printed above the body
    pub header: Option<String>,
    /// Drawer kick appended after the cut
    pub drawer: Option<DrawerCommand>,
}

impl ReceiptOptions {
    pub fn with_drawer(mut self, drawer: DrawerCommand) -> Self {
        self.drawer = Some(drawer);
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }
}

/// Plain receipt: `initialize ++ text ++ LF ++ feed(3) ++ cut`
pub fn build_receipt(body: &str) -> Vec<u8> {
    build_receipt_with(body, &ReceiptOptions::default())
}

/// Compose a receipt.
///
/// Order: initialize, header, alignment/emphasis, body, LF, style reset,
/// trailing feed, cut, optional drawer kick.
pub fn build_receipt_with(body: &str, options: &ReceiptOptions) -> Vec<u8> {
    let mut b = EscPosBuilder::new();

    if let Some(header) = &options.header {
        b.center().bold().line(header).bold_off().left();
    }

    if options.alignment != Alignment::Left {
        b.align(options.alignment);
    }
    if options.bold {
        b.bold();
    }
    if options.double_size {
        b.double_size();
    }

    b.line(body);

    if options.double_size {
        b.reset_size();
    }
    if options.bold {
        b.bold_off();
    }
    if options.alignment != Alignment::Left {
        b.left();
    }

    b.feed(RECEIPT_TRAILING_FEED).cut();

    if let Some(drawer) = options.drawer {
        b.open_drawer(drawer);
    }

    b.build()
}
