// Declare a combine parser over `&str` input with no arguments other than
// the ones listed.
macro_rules! p (
    ($name:ident( $($arg: ident :  $arg_type: ty),* ) -> $ret:ty, $code:expr) => (
        combine::parser!{
            pub fn $name['a, I]($($arg : $arg_type),*)(I) -> $ret
                where
                [I: combine::stream::RangeStream<
                 Range = &'a str,
                 Token = char>,
                 I::Error: combine::ParseError<char, &'a str, <I as combine::stream::StreamOnce>::Position>,
            ]            {
                $code
            }
        }
    );
);

// Declare a combine parser that wraps another parser and yields its output.
macro_rules! wrapper {
    ($name:ident($delegate: ident), $code:expr) => (
        combine::parser!{
            pub fn $name['a, I, P]($delegate: P)(I) -> P::Output
                where
                [I: combine::stream::RangeStream<
                 Range = &'a str,
                 Token = char>,
                 I::Error: combine::ParseError<char, &'a str, <I as combine::stream::StreamOnce>::Position>,
                 P: combine::Parser<I>,
            ]            {
                $code
            }
        }
    );
}
