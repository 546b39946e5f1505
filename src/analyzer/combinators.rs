use super::core::ParseError;
use super::core::ParseResult;
use super::core::Parser;
use std::fmt;
use std::marker::PhantomData;

// Equal: consumes one item equal to `value`
#[derive(Clone)]
pub struct Equal<I> {
    value: I,
}

impl<I> Equal<I> {
    pub fn new(value: I) -> Self {
        Self { value }
    }
}

impl<I: Clone + PartialEq + fmt::Display> Parser<I, I> for Equal<I> {
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<I> {
        match input.get(pos) {
            Some(found) if *found == self.value => Ok((pos + 1, found.clone())),
            Some(found) => Err(ParseError::Fail(format!(
                "expected `{}`, found `{}` at token {}",
                self.value, found, pos
            ))),
            None => Err(ParseError::EOF),
        }
    }
}

// Satisfy: consumes one item the function maps to `Some`
#[derive(Clone)]
pub struct Satisfy<I, O, F> {
    f: F,
    _phantom: PhantomData<(I, O)>,
}

impl<I, O, F> Satisfy<I, O, F> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<I, O, F> Parser<I, O> for Satisfy<I, O, F>
where
    F: Fn(&I) -> Option<O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        let item = input.get(pos).ok_or(ParseError::EOF)?;
        (self.f)(item)
            .map(|result| (pos + 1, result))
            .ok_or(ParseError::Unexpected)
    }
}

pub struct Choice<I, O> {
    parsers: Vec<Box<dyn Parser<I, O>>>,
}

impl<I, O> Choice<I, O> {
    pub fn new(parsers: Vec<Box<dyn Parser<I, O>>>) -> Self {
        Self { parsers }
    }
}

impl<I, O> Parser<I, O> for Choice<I, O> {
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        for parser in &self.parsers {
            if let Ok(result) = parser.parse(input, pos) {
                return Ok(result);
            }
        }
        Err(ParseError::NoAlternative)
    }
}

#[derive(Clone)]
pub struct Preceded<P1, P2, I, O> {
    parser1: P1,
    parser2: P2,
    _phantom: PhantomData<(I, O)>,
}

impl<P1, P2, I, O> Preceded<P1, P2, I, O> {
    pub fn new(parser1: P1, parser2: P2) -> Self {
        Self {
            parser1,
            parser2,
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, I, O> Parser<I, O> for Preceded<P1, P2, I, O>
where
    P1: Parser<I, ()>,
    P2: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        let (pos, _) = self.parser1.parse(input, pos)?;
        self.parser2.parse(input, pos)
    }
}

#[derive(Clone)]
pub struct Map<P, F, A, B> {
    parser: P,
    f: F,
    _phantom: PhantomData<(A, B)>,
}

impl<P, F, A, B> Map<P, F, A, B> {
    pub fn new(parser: P, f: F) -> Self {
        Self {
            parser,
            f,
            _phantom: PhantomData,
        }
    }
}

impl<I, A, B, P, F> Parser<I, B> for Map<P, F, A, B>
where
    P: Parser<I, A>,
    F: Fn(A) -> B,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<B> {
        self.parser
            .parse(input, pos)
            .map(|(pos, value)| (pos, (self.f)(value)))
    }
}

#[derive(Clone)]
pub struct AsUnit<P, O> {
    parser: P,
    _phantom: PhantomData<O>,
}

impl<P, O> AsUnit<P, O> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<I, P, O> Parser<I, ()> for AsUnit<P, O>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<()> {
        self.parser.parse(input, pos).map(|(pos, _)| (pos, ()))
    }
}

#[derive(Clone)]
pub struct Many<P, I, O> {
    parser: P,
    _phantom: PhantomData<(I, O)>,
}

impl<P, I, O> Many<P, I, O> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<I, O, P> Parser<I, Vec<O>> for Many<P, I, O>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<Vec<O>> {
        let mut results = Vec::new();
        let mut current_pos = pos;

        while let Ok((new_pos, value)) = self.parser.parse(input, current_pos) {
            results.push(value);
            current_pos = new_pos;
        }

        Ok((current_pos, results))
    }
}

/// Items separated by a separator; a trailing separator is consumed.
pub struct SeparatedList<P, S, I, O> {
    item_parser: P,
    separator_parser: S,
    _phantom: PhantomData<(I, O)>,
}

impl<P, S, I, O> SeparatedList<P, S, I, O> {
    pub fn new(item_parser: P, separator_parser: S) -> Self {
        Self {
            item_parser,
            separator_parser,
            _phantom: PhantomData,
        }
    }
}

impl<I, O, P, S> Parser<I, Vec<O>> for SeparatedList<P, S, I, O>
where
    P: Parser<I, O>,
    S: Parser<I, ()>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<Vec<O>> {
        let mut results = Vec::new();
        let mut current_pos = pos;

        if let Ok((new_pos, value)) = self.item_parser.parse(input, current_pos) {
            results.push(value);
            current_pos = new_pos;

            while let Ok((sep_pos, _)) = self.separator_parser.parse(input, current_pos) {
                current_pos = sep_pos;
                match self.item_parser.parse(input, current_pos) {
                    Ok((new_pos, value)) => {
                        results.push(value);
                        current_pos = new_pos;
                    }
                    Err(_) => break,
                }
            }
        }

        Ok((current_pos, results))
    }
}

#[derive(Clone)]
pub struct Optional<P, I, O> {
    parser: P,
    _phantom: PhantomData<(I, O)>,
}

impl<P, I, O> Optional<P, I, O> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<I, O, P> Parser<I, Option<O>> for Optional<P, I, O>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<Option<O>> {
        match self.parser.parse(input, pos) {
            Ok((new_pos, value)) => Ok((new_pos, Some(value))),
            Err(_) => Ok((pos, None)),
        }
    }
}

#[derive(Clone)]
pub struct Tuple2<P1, P2, I, O1, O2> {
    parser1: P1,
    parser2: P2,
    _phantom: PhantomData<(I, O1, O2)>,
}

impl<P1, P2, I, O1, O2> Tuple2<P1, P2, I, O1, O2> {
    pub fn new(parser1: P1, parser2: P2) -> Self {
        Self {
            parser1,
            parser2,
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, I, O1, O2> Parser<I, (O1, O2)> for Tuple2<P1, P2, I, O1, O2>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<(O1, O2)> {
        let (pos, result1) = self.parser1.parse(input, pos)?;
        let (pos, result2) = self.parser2.parse(input, pos)?;
        Ok((pos, (result1, result2)))
    }
}

#[derive(Clone)]
pub struct Tuple3<P1, P2, P3, I, O1, O2, O3> {
    parser1: P1,
    parser2: P2,
    parser3: P3,
    _phantom: PhantomData<(I, O1, O2, O3)>,
}

impl<P1, P2, P3, I, O1, O2, O3> Tuple3<P1, P2, P3, I, O1, O2, O3> {
    pub fn new(parser1: P1, parser2: P2, parser3: P3) -> Self {
        Self {
            parser1,
            parser2,
            parser3,
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, P3, I, O1, O2, O3> Parser<I, (O1, O2, O3)> for Tuple3<P1, P2, P3, I, O1, O2, O3>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
    P3: Parser<I, O3>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<(O1, O2, O3)> {
        let (pos, result1) = self.parser1.parse(input, pos)?;
        let (pos, result2) = self.parser2.parse(input, pos)?;
        let (pos, result3) = self.parser3.parse(input, pos)?;
        Ok((pos, (result1, result2, result3)))
    }
}

#[derive(Clone)]
pub struct Delimited<L, P, R, I, O> {
    left: L,
    parser: P,
    right: R,
    _phantom: PhantomData<(I, O)>,
}

impl<L, P, R, I, O> Delimited<L, P, R, I, O> {
    pub fn new(left: L, parser: P, right: R) -> Self {
        Self {
            left,
            parser,
            right,
            _phantom: PhantomData,
        }
    }
}

impl<I, O, L, P, R> Parser<I, O> for Delimited<L, P, R, I, O>
where
    L: Parser<I, ()>,
    P: Parser<I, O>,
    R: Parser<I, ()>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        let (pos, _) = self.left.parse(input, pos)?;
        let (pos, value) = self.parser.parse(input, pos)?;
        let (pos, _) = self.right.parse(input, pos)?;
        Ok((pos, value))
    }
}

#[derive(Clone)]
pub struct WithContext<P, C> {
    parser: P,
    context: C,
}

impl<P, C> WithContext<P, C> {
    pub fn new(parser: P, context: C) -> Self {
        Self { parser, context }
    }
}

impl<I, O, P, C: ToString> Parser<I, O> for WithContext<P, C>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        self.parser
            .parse(input, pos)
            .map_err(|e| ParseError::WithContext {
                message: self.context.to_string(),
                inner: Box::new(e),
            })
    }
}

/// Defers construction of the inner parser until parse time, which is how
/// recursive grammar rules refer to themselves.
#[derive(Clone)]
pub struct Lazy<F> {
    f: F,
}

impl<F> Lazy<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<I, O, F, P> Parser<I, O> for Lazy<F>
where
    F: Fn() -> P,
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        (self.f)().parse(input, pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit() -> Satisfy<char, u32, impl Fn(&char) -> Option<u32> + Clone> {
        Satisfy::new(|c: &char| c.to_digit(10))
    }

    fn comma() -> Satisfy<char, (), impl Fn(&char) -> Option<()> + Clone> {
        Satisfy::new(|c: &char| if *c == ',' { Some(()) } else { None })
    }

    #[test]
    fn test_equal() {
        let input = vec!['a', 'b'];
        assert_eq!(Equal::new('a').parse(&input, 0), Ok((1, 'a')));
        assert!(matches!(
            Equal::new('a').parse(&input, 1),
            Err(ParseError::Fail(_))
        ));
        assert_eq!(Equal::new('a').parse(&input, 2), Err(ParseError::EOF));
    }

    #[test]
    fn test_satisfy() {
        let input = vec!['1', 'x'];
        assert_eq!(digit().parse(&input, 0), Ok((1, 1)));
        assert_eq!(digit().parse(&input, 1), Err(ParseError::Unexpected));
        assert_eq!(digit().parse(&input, 2), Err(ParseError::EOF));
    }

    #[test]
    fn test_choice() {
        let input = vec!['x'];
        let parser = Choice::new(vec![
            Box::new(Map::new(digit(), |d: u32| d.to_string())),
            Box::new(Satisfy::new(|c: &char| Some(c.to_string()))),
        ]);
        assert_eq!(parser.parse(&input, 0), Ok((1, "x".to_string())));

        let parser: Choice<char, u32> = Choice::new(vec![Box::new(digit())]);
        assert_eq!(parser.parse(&input, 0), Err(ParseError::NoAlternative));
    }

    #[test]
    fn test_many_stops_at_first_failure() {
        let input = vec!['1', '2', 'x'];
        assert_eq!(Many::new(digit()).parse(&input, 0), Ok((2, vec![1, 2])));
        assert_eq!(Many::new(digit()).parse(&input, 2), Ok((2, vec![])));
    }

    #[test]
    fn test_separated_list() {
        let parser = SeparatedList::new(digit(), comma());

        let input: Vec<char> = vec![];
        assert_eq!(parser.parse(&input, 0), Ok((0, vec![])));

        let input: Vec<char> = "1,2,3".chars().collect();
        assert_eq!(parser.parse(&input, 0), Ok((5, vec![1, 2, 3])));

        // trailing separator is consumed
        let input: Vec<char> = "1,2,".chars().collect();
        assert_eq!(parser.parse(&input, 0), Ok((4, vec![1, 2])));

        // a lone separator is not a list
        let input: Vec<char> = vec![','];
        assert_eq!(parser.parse(&input, 0), Ok((0, vec![])));
    }

    #[test]
    fn test_optional() {
        let input = vec!['1', 'x'];
        assert_eq!(Optional::new(digit()).parse(&input, 0), Ok((1, Some(1))));
        assert_eq!(Optional::new(digit()).parse(&input, 1), Ok((1, None)));
    }

    #[test]
    fn test_delimited() {
        let input: Vec<char> = "(1)".chars().collect();
        let open = AsUnit::new(Equal::new('('));
        let close = AsUnit::new(Equal::new(')'));
        let parser = Delimited::new(open, digit(), close);
        assert_eq!(parser.parse(&input, 0), Ok((3, 1)));

        let input: Vec<char> = "(1".chars().collect();
        assert_eq!(parser.parse(&input, 0), Err(ParseError::EOF));
    }

    #[test]
    fn test_with_context_wraps_error() {
        let input = vec!['x'];
        let parser = WithContext::new(digit(), "digit");
        assert_eq!(
            parser.parse(&input, 0),
            Err(ParseError::WithContext {
                message: "digit".to_string(),
                inner: Box::new(ParseError::Unexpected),
            })
        );
    }

    #[test]
    fn test_tuple_and_preceded() {
        let input: Vec<char> = ",1,2".chars().collect();
        let parser = Preceded::new(comma(), Tuple3::new(digit(), comma(), digit()));
        assert_eq!(parser.parse(&input, 0), Ok((4, (1, (), 2))));

        let parser = Tuple2::new(comma(), digit());
        assert_eq!(parser.parse(&input, 0), Ok((2, ((), 1))));
    }
}
