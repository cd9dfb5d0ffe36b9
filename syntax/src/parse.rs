use anyhow::Result;

#[derive(Debug, thiserror::Error)]
#[error("ParseError at offset {pos} on line '{line}': {msg}")]
pub struct Error {
    msg: String,
    pos: usize,
    line: String,
}

/// Parse the text of a config file into a list of blocks.
pub fn parse(text: &str) -> Result<Vec<crate::ast::Block<'_>>> {
    use combine::EasyParser;
    config_file::blocks()
        .easy_parse(text)
        .map(|(blocks, _remainder)| blocks)
        .map_err(|e| {
            let pos = e.position.translate_position(text);
            // isolate the line in question:
            let before = &text[0..pos];
            let after = &text[pos..text.len()];
            let prefix: String = before.chars().rev().take_while(|&c| c != '\n').collect();
            let prefix: String = prefix.chars().rev().collect();
            let suffix: String = after.chars().take_while(|&c| c != '\n').collect();
            let line = prefix + &suffix;
            // combine's errors borrow the input, so stringify before returning.
            Error {
                pos,
                line,
                msg: format!("{}", e),
            }
            .into()
        })
}

pub mod prelude {
    pub use combine::parser::char::char;
    pub use combine::parser::range::recognize;
    pub use combine::*;
}

pub mod util {

    use super::prelude::*;
    use combine::parser::char::{alpha_num, letter, space};

    p! {
        ident_start() -> char, {
            char('_').or(letter())
        }
    }

    p! {
        ident_rest() -> Vec<char>, {
            many(char('_').or(alpha_num()))
        }
    }

    p! {
        ident() -> &'a str, {
            recognize(ident_start().and(ident_rest()))
        }
    }

    p! {
        comment() -> &'a str, {
            recognize(
                char('#').and(skip_many(none_of("\n".chars())))
            )
        }
    }

    p! {
        whitespace() -> (), {
            skip_many1(
                space().map(|_| ()).or(comment().map(|_| ()))
            )
        }
    }

    p! {
        line_internal_whitespace() -> (), {
            skip_many1(satisfy(|c: char| c.is_whitespace() && c != '\n'))
        }
    }

    wrapper! {
        lex_inline(parser), {
            optional(line_internal_whitespace())
                .with(parser)
                .skip(optional(line_internal_whitespace()))
        }
    }

    wrapper! {
        braces(parser), {
            char('{').with(parser).skip(char('}'))
        }
    }

    p! {
        eol() -> (), {
            eof().or(
                optional(comment())
                    .with(char('\n'))
                    .and(optional(whitespace()))
                    .map(|_| ())
            )
        }
    }

    wrapper! {
        line(parser), {
            lex_inline(parser).skip(eol())
        }
    }

}

mod literal {

    use super::prelude::*;

    const FORBID_UNQUOTED: [char; 5] = ['"', '#', '{', '}', '='];

    p! {
        double_quoted_literal() -> &'a str, {
            char('"')
                .with(recognize(skip_many(none_of("\"\n".chars()))))
                .skip(char('"'))
        }
    }

    p! {
        unquoted_literal() -> &'a str, {
            recognize(skip_many1(satisfy(|c: char|
                !c.is_whitespace() && !FORBID_UNQUOTED.contains(&c)
            )))
        }
    }

    p! {
        literal() -> &'a str, {
            double_quoted_literal().or(unquoted_literal())
        }
    }

    #[cfg(test)]
    mod test {
        use anyhow::Result;
        use combine::EasyParser;
        #[test]
        fn test_literal() -> Result<()> {
            assert_eq!("css", super::literal().easy_parse("css").unwrap().0);
            assert_eq!(
                "./Styles/**/landing.scss",
                super::literal().easy_parse("./Styles/**/landing.scss").unwrap().0
            );
            assert_eq!(
                "with spaces/*.js",
                super::literal().easy_parse("\"with spaces/*.js\"").unwrap().0
            );
            assert_eq!("", super::literal().easy_parse("\"\"").unwrap().0);
            Ok(())
        }
    }
}

mod assignment {

    use super::literal::literal;
    use super::prelude::*;
    use super::util::{ident, lex_inline};
    use crate::ast::Assignment;

    p! {
        assignment() -> Assignment<'a>, {
            ident().skip(lex_inline(char('='))).and(literal())
        }
    }

    #[cfg(test)]
    mod test {
        use anyhow::Result;
        use combine::EasyParser;
        #[test]
        fn test_assignment() -> Result<()> {
            assert_eq!(
                ("scripts_output", "./wwwroot/dist/js/"),
                super::assignment()
                    .easy_parse("scripts_output = ./wwwroot/dist/js/")
                    .unwrap()
                    .0
            );
            assert_eq!(
                ("styles_exclude", "css"),
                super::assignment().easy_parse("styles_exclude=\"css\"").unwrap().0
            );
            Ok(())
        }
    }
}

mod block {

    use super::assignment::assignment;
    use super::prelude::*;
    use super::util::{braces, ident, line, whitespace};
    use crate::ast::Block;

    p! {
        block() -> Block<'a>, {
            ident()
                .skip(optional(whitespace()))
                .and(braces(
                    optional(whitespace()).with(many(line(assignment())))
                ))
                .map(|(name, assignments)| Block { name, assignments })
        }
    }
}

mod config_file {
    use super::block::block;
    use super::prelude::*;
    use super::util::whitespace;
    use crate::ast::Block;

    p! {
        blocks() -> Vec<Block<'a>>, {
            optional(whitespace())
                .with(many(block().skip(optional(whitespace()))))
                .skip(eof())
        }
    }
}
