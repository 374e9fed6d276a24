use crate::engine::lexer::Token;

/// Names a token for an error message, e.g. `identifier 'x'` or `'+'`.
#[must_use]
pub fn describe(token: &Token) -> String {
    match token {
        Token::Number(value) => format!("number {value}"),
        Token::Str(value) => format!("string \"{value}\""),
        Token::Bool(value) => format!("'{value}'"),
        Token::Identifier(name) => format!("identifier '{name}'"),
        Token::Mod => "'mod'".to_string(),
        Token::And => "'and'".to_string(),
        Token::Or => "'or'".to_string(),
        Token::Not => "'not'".to_string(),
        Token::Plus => "'+'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::Slash => "'/'".to_string(),
        Token::Percent => "'%'".to_string(),
        Token::Caret => "'^'".to_string(),
        Token::Bang => "'!'".to_string(),
        Token::Quote => "\"'\"".to_string(),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::LBracket => "'['".to_string(),
        Token::RBracket => "']'".to_string(),
        Token::LBrace => "'{'".to_string(),
        Token::RBrace => "'}'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Semicolon => "';'".to_string(),
        Token::Colon => "':'".to_string(),
        Token::Dot => "'.'".to_string(),
        Token::Question => "'?'".to_string(),
        Token::Equals => "'='".to_string(),
        Token::EqualEqual => "'=='".to_string(),
        Token::BangEqual => "'!='".to_string(),
        Token::LessEqual => "'<='".to_string(),
        Token::GreaterEqual => "'>='".to_string(),
        Token::Less => "'<'".to_string(),
        Token::Greater => "'>'".to_string(),
        Token::Ampersand => "'&'".to_string(),
        Token::Pipe => "'|'".to_string(),
        Token::CaretPipe => "'^|'".to_string(),
        Token::LeftShift => "'<<'".to_string(),
        Token::RightShift => "'>>'".to_string(),
        Token::RightShiftLogical => "'>>>'".to_string(),
        Token::Tilde => "'~'".to_string(),
        Token::NewLine => "end of line".to_string(),
        Token::Comment | Token::Ignored => "whitespace".to_string(),
    }
}
