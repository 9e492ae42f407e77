use minic::grammer::token::{TokenKind, TokenKind::*};
use minic::{Error, Lexer};

fn tokens(code: &str) -> Result<Vec<TokenKind>, Error> {
    println!(" {code}");
    Lexer::from_source(code)?
        .map(|res| res.map(|token| token.kind))
        .collect()
}

fn assert(code: &str, expects: Vec<TokenKind>) {
    let kinds = tokens(code).unwrap();
    for (idx, kind) in kinds.iter().enumerate() {
        println!("{:>2}: {:?}", idx, kind);
    }
    assert_eq!(kinds, expects);
}

macro_rules! case {
    ($name:ident, $code:expr, [$($expect:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            assert($code, vec![$($expect),*]);
        }
    };
}

case!(
    assignments,
    "a = 775; basket = 9798;",
    [
        Ident("a".into()),
        Equal,
        Integer("775".into()),
        Semicolon,
        Ident("basket".into()),
        Equal,
        Integer("9798".into()),
        Semicolon,
        EOF,
    ]
);

case!(
    block_comment,
    "a /*comment*/ = 1",
    [Ident("a".into()), Equal, Integer("1".into()), EOF]
);

case!(
    line_comment,
    "a // comment\n= 1",
    [Ident("a".into()), Equal, Integer("1".into()), EOF]
);

case!(
    comment_at_end,
    "print 1 // trailing",
    [KwPrint, Integer("1".into()), EOF]
);

case!(
    comment_with_stars,
    "a /* ** / * */ b",
    [Ident("a".into()), Ident("b".into()), EOF]
);

case!(
    no_spaces,
    "if((a)>=(1.5)){b=a^2}",
    [
        KwIf,
        LParen,
        LParen,
        Ident("a".into()),
        RParen,
        RAngleEqual,
        LParen,
        Double("1.5".into()),
        RParen,
        RParen,
        LCurly,
        Ident("b".into()),
        Equal,
        Ident("a".into()),
        Caret,
        Integer("2".into()),
        RCurly,
        EOF,
    ]
);

case!(
    method_header,
    "double sum(int a, double b)",
    [
        KwDouble,
        Ident("sum".into()),
        LParen,
        KwInt,
        Ident("a".into()),
        Comma,
        KwDouble,
        Ident("b".into()),
        RParen,
        EOF,
    ]
);

case!(
    assign_then_compare,
    "a==b=c",
    [Ident("a".into()), EqualEqual, Ident("b".into()), Equal, Ident("c".into()), EOF]
);

case!(
    letters_then_digits,
    "ab12",
    [Ident("ab".into()), Integer("12".into()), EOF]
);

#[test]
fn comments_are_transparent() {
    let plain = tokens("int a; a = 1").unwrap();
    let commented = tokens("int /* x */ a; // y\n a /**/ = 1").unwrap();
    assert_eq!(plain, commented);
}

#[test]
fn illegal_character() {
    let err = tokens("a = 1 # 2").unwrap_err();
    assert!(err.is_lexical());
    assert!(matches!(err, Error::IllegalCharacter('#', pos) if pos.col == 7));
}

#[test]
fn lone_ampersand() {
    assert!(matches!(tokens("a & b"), Err(Error::IllegalCharacter('&', _))));
    assert!(matches!(tokens("a | b"), Err(Error::IllegalCharacter('|', _))));
}

#[test]
fn unterminated_comment() {
    let err = tokens("a /* never closed").unwrap_err();
    assert!(matches!(err, Error::UnterminatedComment(pos) if pos.col == 3));
}
