//! Script parser
//!
//! Recursive descent for statements, Pratt-style binding powers for binary
//! operators.

use std::rc::Rc;

use super::ast::*;
use super::error::{ScriptError, ScriptResult};
use super::lexer::{lex, Token, TokenKind};

/// Binding power levels
pub const BP_LOWEST: u8 = 0;
pub const BP_OR: u8 = 1;
pub const BP_AND: u8 = 2;
pub const BP_NOT: u8 = 3;
pub const BP_CMP: u8 = 4;
pub const BP_ADD: u8 = 5;
pub const BP_MUL: u8 = 6;
pub const BP_UNARY: u8 = 7;
pub const BP_POW: u8 = 8;

/// Deepest nesting of expressions, and of blocks, the parser accepts
pub const MAX_NESTING_DEPTH: usize = 100;

/// Most operators one expression level may chain (`a + b + ...`)
pub const MAX_OPERATOR_CHAIN: usize = 200;

#[derive(Debug, Clone, Copy)]
enum Infix {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Enclosing function bodies
    fn_depth: usize,
    /// Enclosing loops within the current function
    loop_depth: usize,
    /// Enclosing sub-expressions
    expr_depth: usize,
    /// Enclosing blocks
    block_depth: usize,
}

/// Parse a snippet into a program
pub fn parse(source: &str) -> ScriptResult<Program> {
    let tokens = lex(source)?;
    Parser::new(tokens).parse_program()
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            fn_depth: 0,
            loop_depth: 0,
            expr_depth: 0,
            block_depth: 0,
        }
    }

    fn current(&self) -> &Token {
        // lex() always terminates the stream with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn nth_kind(
        &self,
        offset: usize,
    ) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(
        &self,
        kind: &TokenKind,
    ) -> bool {
        self.peek_kind() == kind
    }

    fn eat(
        &mut self,
        kind: &TokenKind,
    ) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error(
        &self,
        message: impl Into<String>,
    ) -> ScriptError {
        ScriptError::syntax(message).at_line(self.current().line)
    }

    fn unexpected(&self) -> ScriptError {
        match self.peek_kind() {
            TokenKind::Eof => self.error("unexpected end of input"),
            TokenKind::Newline => self.error("unexpected end of line"),
            other => self.error(format!("unexpected token {:?}", other)),
        }
    }

    fn expect(
        &mut self,
        kind: TokenKind,
    ) -> ScriptResult<Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_ident(&mut self) -> ScriptResult<String> {
        match self.peek_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Semicolon) {
            self.advance();
        }
    }

    /// After a statement: a separator, or the end of the enclosing block
    fn end_statement(&mut self) -> ScriptResult<()> {
        match self.peek_kind() {
            TokenKind::Newline | TokenKind::Semicolon => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof | TokenKind::RBrace => Ok(()),
            _ => Err(self.unexpected()),
        }
    }

    pub fn parse_program(&mut self) -> ScriptResult<Program> {
        let mut statements = Vec::new();
        loop {
            self.skip_separators();
            match self.peek_kind() {
                TokenKind::Eof => break,
                TokenKind::RBrace => return Err(self.unexpected()),
                _ => {
                    statements.push(self.parse_statement()?);
                    self.end_statement()?;
                }
            }
        }
        Ok(Program { statements })
    }

    fn parse_block(&mut self) -> ScriptResult<Vec<Stmt>> {
        if self.block_depth >= MAX_NESTING_DEPTH {
            return Err(self.error("too many statically nested blocks"));
        }
        self.block_depth += 1;
        let body = self.parse_block_body();
        self.block_depth -= 1;
        body
    }

    fn parse_block_body(&mut self) -> ScriptResult<Vec<Stmt>> {
        self.skip_newlines();
        self.expect(TokenKind::LBrace)?;
        let mut body = Vec::new();
        loop {
            self.skip_separators();
            match self.peek_kind() {
                TokenKind::RBrace => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => return Err(self.error("expected '}' before end of input")),
                _ => {
                    body.push(self.parse_statement()?);
                    self.end_statement()?;
                }
            }
        }
        Ok(body)
    }

    fn parse_statement(&mut self) -> ScriptResult<Stmt> {
        let line = self.current().line;
        let kind = match self.peek_kind() {
            TokenKind::KwDef => self.parse_def()?,
            TokenKind::KwIf => self.parse_if()?,
            TokenKind::KwWhile => {
                self.advance();
                let condition = self.parse_expression()?;
                let body = self.parse_loop_body()?;
                StmtKind::While { condition, body }
            }
            TokenKind::KwFor => {
                self.advance();
                let var = self.expect_ident()?;
                self.expect(TokenKind::KwIn)?;
                let iterable = self.parse_expression()?;
                let body = self.parse_loop_body()?;
                StmtKind::For {
                    var,
                    iterable,
                    body,
                }
            }
            TokenKind::KwReturn => {
                if self.fn_depth == 0 {
                    return Err(self.error("'return' outside function"));
                }
                self.advance();
                match self.peek_kind() {
                    TokenKind::Newline | TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => {
                        StmtKind::Return(None)
                    }
                    _ => StmtKind::Return(Some(self.parse_expression()?)),
                }
            }
            TokenKind::KwBreak => {
                if self.loop_depth == 0 {
                    return Err(self.error("'break' outside loop"));
                }
                self.advance();
                StmtKind::Break
            }
            TokenKind::KwContinue => {
                if self.loop_depth == 0 {
                    return Err(self.error("'continue' not properly in loop"));
                }
                self.advance();
                StmtKind::Continue
            }
            TokenKind::KwPass => {
                self.advance();
                StmtKind::Pass
            }
            TokenKind::KwDel => {
                self.advance();
                let mut names = vec![self.expect_ident()?];
                while self.eat(&TokenKind::Comma) {
                    names.push(self.expect_ident()?);
                }
                StmtKind::Del(names)
            }
            _ => self.parse_simple_statement()?,
        };
        Ok(Stmt { kind, line })
    }

    fn parse_def(&mut self) -> ScriptResult<StmtKind> {
        self.expect(TokenKind::KwDef)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) {
            let param = self.expect_ident()?;
            if params.contains(&param) {
                return Err(self.error(format!("duplicate argument '{}' in function definition", param)));
            }
            params.push(param);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;

        let outer_loops = std::mem::take(&mut self.loop_depth);
        self.fn_depth += 1;
        let body = self.parse_block();
        self.fn_depth -= 1;
        self.loop_depth = outer_loops;
        let body = body?;
        Ok(StmtKind::Def(Rc::new(FunctionDef { name, params, body })))
    }

    fn parse_loop_body(&mut self) -> ScriptResult<Vec<Stmt>> {
        self.loop_depth += 1;
        let body = self.parse_block();
        self.loop_depth -= 1;
        body
    }

    /// Consume newlines only when the next real token is `kind`
    fn eat_across_newlines(
        &mut self,
        kind: &TokenKind,
    ) -> bool {
        let mut offset = 0;
        while self.nth_kind(offset) == &TokenKind::Newline {
            offset += 1;
        }
        if self.nth_kind(offset) == kind {
            for _ in 0..=offset {
                self.advance();
            }
            true
        } else {
            false
        }
    }

    fn parse_if(&mut self) -> ScriptResult<StmtKind> {
        self.expect(TokenKind::KwIf)?;
        let mut branches = Vec::new();
        let condition = self.parse_expression()?;
        branches.push((condition, self.parse_block()?));

        let mut orelse = Vec::new();
        loop {
            if self.eat_across_newlines(&TokenKind::KwElif) {
                let condition = self.parse_expression()?;
                branches.push((condition, self.parse_block()?));
            } else if self.eat_across_newlines(&TokenKind::KwElse) {
                orelse = self.parse_block()?;
                break;
            } else {
                break;
            }
        }
        Ok(StmtKind::If { branches, orelse })
    }

    fn parse_simple_statement(&mut self) -> ScriptResult<StmtKind> {
        let expr = self.parse_expression()?;
        let aug = match self.peek_kind() {
            TokenKind::Assign => {
                self.advance();
                let target = self.to_target(expr)?;
                let value = self.parse_expression()?;
                return Ok(StmtKind::Assign { target, value });
            }
            TokenKind::PlusAssign => BinaryOp::Add,
            TokenKind::MinusAssign => BinaryOp::Sub,
            TokenKind::StarAssign => BinaryOp::Mul,
            TokenKind::SlashAssign => BinaryOp::Div,
            _ => return Ok(StmtKind::Expr(expr)),
        };
        self.advance();
        let target = self.to_target(expr)?;
        let value = self.parse_expression()?;
        Ok(StmtKind::AugAssign {
            target,
            op: aug,
            value,
        })
    }

    fn to_target(
        &self,
        expr: Expr,
    ) -> ScriptResult<Target> {
        match expr {
            Expr::Name(name) => Ok(Target::Name(name)),
            Expr::Index { object, index } => Ok(Target::Index {
                object: *object,
                index: *index,
            }),
            _ => Err(self.error("cannot assign to expression")),
        }
    }

    pub fn parse_expression(&mut self) -> ScriptResult<Expr> {
        self.parse_expr_bp(BP_LOWEST)
    }

    /// Infix operator at the cursor: (operator, token count, left bp, right bp)
    fn infix_info(&self) -> Option<(Infix, usize, u8, u8)> {
        let info = match self.peek_kind() {
            TokenKind::KwOr => (Infix::Logical(LogicalOp::Or), 1, BP_OR, BP_OR + 1),
            TokenKind::KwAnd => (Infix::Logical(LogicalOp::And), 1, BP_AND, BP_AND + 1),
            TokenKind::EqEq => (Infix::Binary(BinaryOp::Eq), 1, BP_CMP, BP_CMP + 1),
            TokenKind::Neq => (Infix::Binary(BinaryOp::Ne), 1, BP_CMP, BP_CMP + 1),
            TokenKind::Lt => (Infix::Binary(BinaryOp::Lt), 1, BP_CMP, BP_CMP + 1),
            TokenKind::Le => (Infix::Binary(BinaryOp::Le), 1, BP_CMP, BP_CMP + 1),
            TokenKind::Gt => (Infix::Binary(BinaryOp::Gt), 1, BP_CMP, BP_CMP + 1),
            TokenKind::Ge => (Infix::Binary(BinaryOp::Ge), 1, BP_CMP, BP_CMP + 1),
            TokenKind::KwIn => (Infix::Binary(BinaryOp::In), 1, BP_CMP, BP_CMP + 1),
            TokenKind::KwNot if self.nth_kind(1) == &TokenKind::KwIn => {
                (Infix::Binary(BinaryOp::NotIn), 2, BP_CMP, BP_CMP + 1)
            }
            TokenKind::Plus => (Infix::Binary(BinaryOp::Add), 1, BP_ADD, BP_ADD + 1),
            TokenKind::Minus => (Infix::Binary(BinaryOp::Sub), 1, BP_ADD, BP_ADD + 1),
            TokenKind::Star => (Infix::Binary(BinaryOp::Mul), 1, BP_MUL, BP_MUL + 1),
            TokenKind::Slash => (Infix::Binary(BinaryOp::Div), 1, BP_MUL, BP_MUL + 1),
            TokenKind::SlashSlash => (Infix::Binary(BinaryOp::FloorDiv), 1, BP_MUL, BP_MUL + 1),
            TokenKind::Percent => (Infix::Binary(BinaryOp::Mod), 1, BP_MUL, BP_MUL + 1),
            // right associative
            TokenKind::StarStar => (Infix::Binary(BinaryOp::Pow), 1, BP_POW, BP_POW),
            _ => return None,
        };
        Some(info)
    }

    fn parse_expr_bp(
        &mut self,
        min_bp: u8,
    ) -> ScriptResult<Expr> {
        if self.expr_depth >= MAX_NESTING_DEPTH {
            return Err(self.error("too many nested parentheses"));
        }
        self.expr_depth += 1;
        let expr = self.parse_operators(min_bp);
        self.expr_depth -= 1;
        expr
    }

    fn parse_operators(
        &mut self,
        min_bp: u8,
    ) -> ScriptResult<Expr> {
        let mut lhs = self.parse_prefix()?;

        let mut chained = 0;
        while let Some((op, width, left_bp, right_bp)) = self.infix_info() {
            if left_bp < min_bp {
                break;
            }
            chained += 1;
            if chained > MAX_OPERATOR_CHAIN {
                return Err(self.error("expression too complex"));
            }
            for _ in 0..width {
                self.advance();
            }
            let rhs = Box::new(self.parse_expr_bp(right_bp)?);
            let lhs_box = Box::new(lhs);
            lhs = match op {
                Infix::Binary(op) => Expr::Binary {
                    op,
                    lhs: lhs_box,
                    rhs,
                },
                Infix::Logical(op) => Expr::Logical {
                    op,
                    lhs: lhs_box,
                    rhs,
                },
            };
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> ScriptResult<Expr> {
        let op = match self.peek_kind() {
            TokenKind::KwNot => (UnaryOp::Not, BP_NOT),
            TokenKind::Minus => (UnaryOp::Neg, BP_UNARY),
            TokenKind::Plus => (UnaryOp::Pos, BP_UNARY),
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = Box::new(self.parse_expr_bp(op.1)?);
        Ok(Expr::Unary { op: op.0, operand })
    }

    fn parse_arguments(
        &mut self,
        close: TokenKind,
    ) -> ScriptResult<Vec<Expr>> {
        let mut args = Vec::new();
        while !self.check(&close) {
            args.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(close)?;
        Ok(args)
    }

    fn parse_postfix(&mut self) -> ScriptResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_arguments(TokenKind::RParen)?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                    };
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBracket)?;
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokenKind::Dot => {
                    self.advance();
                    let name = self.expect_ident()?;
                    if !self.eat(&TokenKind::LParen) {
                        return Err(self.error("attribute access is only supported for method calls"));
                    }
                    let args = self.parse_arguments(TokenKind::RParen)?;
                    expr = Expr::Method {
                        object: Box::new(expr),
                        name,
                        args,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> ScriptResult<Expr> {
        let expr = match self.peek_kind().clone() {
            TokenKind::Int(i) => Expr::Int(i),
            TokenKind::Float(f) => Expr::Float(f),
            TokenKind::Str(s) => Expr::Str(Rc::from(s.as_str())),
            TokenKind::Ident(name) => Expr::Name(name),
            TokenKind::KwTrue => Expr::Bool(true),
            TokenKind::KwFalse => Expr::Bool(false),
            TokenKind::KwNone => Expr::None,
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::LBracket => {
                self.advance();
                return Ok(Expr::List(self.parse_arguments(TokenKind::RBracket)?));
            }
            TokenKind::LBrace => {
                self.advance();
                return self.parse_dict();
            }
            _ => return Err(self.unexpected()),
        };
        self.advance();
        Ok(expr)
    }

    fn parse_dict(&mut self) -> ScriptResult<Expr> {
        let mut entries = Vec::new();
        loop {
            self.skip_newlines();
            if self.eat(&TokenKind::RBrace) {
                break;
            }
            let key = self.parse_expression()?;
            self.expect(TokenKind::Colon)?;
            self.skip_newlines();
            let value = self.parse_expression()?;
            entries.push((key, value));
            self.skip_newlines();
            if !self.eat(&TokenKind::Comma) {
                self.skip_newlines();
                self.expect(TokenKind::RBrace)?;
                break;
            }
        }
        Ok(Expr::Dict(entries))
    }
}
