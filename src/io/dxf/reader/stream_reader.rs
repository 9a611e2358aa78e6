//! DXF stream reader trait and the peekable pair stream built on it

use encoding_rs::Encoding;

use crate::error::{DxfError, Result};
use crate::io::dxf::{CodePair, PairOffset};

/// Group code of comment pairs, which carry no drawing data.
const COMMENT_CODE: i32 = 999;

/// Trait for reading DXF code/value pairs from one physical encoding
pub trait DxfStreamReader {
    /// Read the next code/value pair, `None` at a clean end of stream.
    ///
    /// A stream that ends between a code and its value is an error.
    fn read_pair(&mut self) -> Result<Option<CodePair>>;

    /// Position the next pair will be read from
    fn position(&self) -> PairOffset;

    /// Decode subsequent strings with the given code page
    fn set_encoding(&mut self, encoding: &'static Encoding);
}

/// Pair source over pairs already in memory.
pub struct PairListReader {
    pairs: std::vec::IntoIter<CodePair>,
    index: usize,
}

impl PairListReader {
    pub fn new(pairs: Vec<CodePair>) -> Self {
        Self {
            pairs: pairs.into_iter(),
            index: 0,
        }
    }
}

impl DxfStreamReader for PairListReader {
    fn read_pair(&mut self) -> Result<Option<CodePair>> {
        let pair = self.pairs.next();
        if pair.is_some() {
            self.index += 1;
        }
        Ok(pair)
    }

    fn position(&self) -> PairOffset {
        PairOffset::Line(self.index * 2 + 1)
    }

    fn set_encoding(&mut self, _encoding: &'static Encoding) {}
}

/// Forward-only pair source with a single pair of lookahead.
///
/// This is the contract every section reader and the field projector
/// consume: `peek` does not consume, `advance` does, `has_more` tells a clean
/// end of stream apart from more input. Comment pairs are dropped here.
pub struct PairStream<'a> {
    source: Box<dyn DxfStreamReader + 'a>,
    peeked: Option<CodePair>,
}

impl<'a> PairStream<'a> {
    pub fn new(source: impl DxfStreamReader + 'a) -> Self {
        Self {
            source: Box::new(source),
            peeked: None,
        }
    }

    /// Stream over in-memory pairs.
    pub fn from_pairs(pairs: Vec<CodePair>) -> PairStream<'static> {
        PairStream::new(PairListReader::new(pairs))
    }

    fn fill(&mut self) -> Result<()> {
        while self.peeked.is_none() {
            match self.source.read_pair()? {
                Some(pair) if pair.code == COMMENT_CODE => continue,
                Some(pair) => self.peeked = Some(pair),
                None => break,
            }
        }
        Ok(())
    }

    /// Look at the next pair without consuming it.
    pub fn peek(&mut self) -> Result<Option<&CodePair>> {
        self.fill()?;
        Ok(self.peeked.as_ref())
    }

    /// Group code of the next pair.
    pub fn peek_code(&mut self) -> Result<Option<i32>> {
        Ok(self.peek()?.map(|pair| pair.code))
    }

    /// Consume and return the next pair.
    pub fn advance(&mut self) -> Result<Option<CodePair>> {
        self.fill()?;
        Ok(self.peeked.take())
    }

    pub fn has_more(&mut self) -> Result<bool> {
        Ok(self.peek()?.is_some())
    }

    /// Consume the next pair, failing with a truncation error at end of stream.
    pub fn expect_pair(&mut self, expected: &str) -> Result<CodePair> {
        match self.advance()? {
            Some(pair) => Ok(pair),
            None => Err(DxfError::UnexpectedEndOfStream {
                expected: expected.to_string(),
                offset: self.source.position(),
            }),
        }
    }

    /// Whether the next pair is `code` carrying the string `text`.
    pub fn next_is(&mut self, code: i32, text: &str) -> Result<bool> {
        Ok(self.peek()?.map_or(false, |pair| pair.is(code, text)))
    }

    /// Position of the next pair.
    pub fn position(&self) -> PairOffset {
        match &self.peeked {
            Some(pair) => pair.offset,
            None => self.source.position(),
        }
    }

    pub fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.source.set_encoding(encoding);
    }
}
