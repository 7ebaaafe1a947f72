//! Node construction interface for the reader.

/// Creates the nodes the reader produces.
///
/// The reader calls these in bottom-up order: children are always built
/// before the pair that holds them. Returning `None` from a fallible
/// constructor aborts the parse with
/// [`ParseErrorKind::AllocFailed`](crate::ParseErrorKind::AllocFailed).
///
/// `nil` and `boolean` cannot fail: implementations are expected to hand
/// back shared constants for them.
pub trait Builder {
    /// The node type produced.
    type Node;

    /// The empty list, also produced for the literal `nil` and for `()`.
    fn nil(&mut self) -> Self::Node;

    /// `#t` or `#f`.
    fn boolean(&mut self, value: bool) -> Self::Node;

    /// An integer literal.
    fn integer(&mut self, value: i32) -> Option<Self::Node>;

    /// A symbol. `name` already satisfies the reader's length limit.
    fn symbol(&mut self, name: &str) -> Option<Self::Node>;

    /// A pair.
    fn cons(&mut self, car: Self::Node, cdr: Self::Node) -> Option<Self::Node>;
}
