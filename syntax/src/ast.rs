/// type alias just to make type signatures look more consistent.
pub type Ident<'a> = &'a str;

/// A single `key = value` line inside a block.
pub type Assignment<'a> = (Ident<'a>, &'a str);

/// A named block of assignments, e.g.
/// ```text
/// paths {
///     scripts = "./Scripts/**/*.js"
/// }
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct Block<'a> {
    pub name: Ident<'a>,
    pub assignments: Vec<Assignment<'a>>,
}
