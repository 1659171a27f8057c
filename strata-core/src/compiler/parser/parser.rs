//! Recursive-descent parser with deferred method bodies

use super::error::{ParseResult, ParserError, ParserErrorKind};
use crate::compiler::ast::{
    BinaryOp, Block, Body, Expr, ExprKind, FieldDecl, MethodDecl, ModuleDecl, Param,
    QualifiedName, Stmt, StmtKind, TypeDecl, TypeKind, TypeRef, UnaryOp,
};
use crate::compiler::lexer::{Coordinate, Lexer, Token, TokenKind};
use crate::compiler::result::{CompilationResult, Diagnostic};
use crate::compiler::tree::DeclarationTree;
use crate::compiler::unit::SourceUnit;
use std::sync::Arc;
use strata_config::Phase;
use strata_log::{debug, trace, Logger};

/// Deepest expression tree a unit may contain
pub const MAX_EXPRESSION_DEPTH: usize = 128;
/// Deepest recursion through nested statements, parentheses, arguments or unary operators
pub const MAX_NESTING: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParseMode {
    /// Headers and bodies
    Full,
    /// Headers only; bodies are recorded as byte ranges
    Diet,
}

/// Parser for Strata units
///
/// One instance is shared by everything that parses during a batch run. Its
/// token buffer survives between calls and is only released by
/// [`Parser::reset_state`] (or by dropping a [`ParserSession`](super::ParserSession)).
pub struct Parser {
    tokens: Vec<Token>,
    units_parsed: usize,
    bodies_materialized: usize,
    logger: Arc<Logger>,
}

impl Parser {
    pub fn new() -> Self {
        Self::with_logger(Logger::noop())
    }

    pub fn with_logger(logger: Arc<Logger>) -> Self {
        Self {
            tokens: Vec::new(),
            units_parsed: 0,
            bodies_materialized: 0,
            logger,
        }
    }

    /// Full parse (headers and bodies) that does not involve any environment
    pub fn parse_standalone(&mut self, unit: &SourceUnit, result: CompilationResult) -> DeclarationTree {
        self.parse_unit(unit, result, ParseMode::Full)
    }

    /// Diet parse: method bodies are skipped and left as [`Body::Deferred`]
    pub fn parse(&mut self, unit: &SourceUnit, result: CompilationResult) -> DeclarationTree {
        self.parse_unit(unit, result, ParseMode::Diet)
    }

    fn parse_unit(&mut self, unit: &SourceUnit, result: CompilationResult, mode: ParseMode) -> DeclarationTree {
        let mut tree = DeclarationTree::new(unit.clone(), result);

        self.tokens.clear();
        Lexer::new(unit.content()).tokenize_into(&mut self.tokens);

        let mut cursor = Cursor::new(&self.tokens, &mut tree.result, mode);
        if unit.is_module_descriptor() {
            tree.module = cursor.module_declaration();
        } else {
            let syntax = cursor.compilation_unit();
            tree.package = syntax.package;
            tree.package_malformed = syntax.package_malformed;
            tree.imports = syntax.imports;
            tree.types = syntax.types;
        }

        self.units_parsed += 1;
        debug!(
            self.logger,
            target: Phase::Parse.target(),
            "parsed {} ({:?}): {} types, {} deferred bodies, {} problems",
            unit.name(),
            mode,
            tree.types.len(),
            tree.deferred_body_count(),
            tree.result.diagnostics().len()
        );
        tree
    }

    /// Parse every deferred body of `tree` in place
    pub fn materialize_bodies(&mut self, tree: &mut DeclarationTree) {
        let unit = tree.unit.clone();
        let mut count = 0;

        for decl in tree.types.iter_mut() {
            for method in decl.methods.iter_mut() {
                let Body::Deferred { range, start } = &method.body else {
                    continue;
                };
                let (range, start) = (range.clone(), *start);

                self.tokens.clear();
                Lexer::for_range(unit.content(), range, start).tokenize_into(&mut self.tokens);

                let mut cursor = Cursor::new(&self.tokens, &mut tree.result, ParseMode::Full);
                method.body = Body::Parsed(cursor.body_block());
                count += 1;
            }
        }

        self.bodies_materialized += count;
        if count > 0 {
            trace!(
                self.logger,
                target: Phase::Parse.target(),
                "materialized {} bodies in {}",
                count,
                unit.name()
            );
        }
    }

    /// Drop buffered tokens and counters left by earlier parses
    pub fn reset_state(&mut self) {
        self.tokens.clear();
        self.tokens.shrink_to_fit();
        self.units_parsed = 0;
        self.bodies_materialized = 0;
    }

    /// Tokens still held from the last parse
    pub fn buffered_tokens(&self) -> usize {
        self.tokens.len()
    }

    pub fn units_parsed(&self) -> usize {
        self.units_parsed
    }

    pub fn bodies_materialized(&self) -> usize {
        self.bodies_materialized
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Header-level contents of an ordinary unit
#[derive(Default)]
struct UnitSyntax {
    package: Option<QualifiedName>,
    package_malformed: bool,
    imports: Vec<QualifiedName>,
    types: Vec<TypeDecl>,
}

enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
}

/// Position in a token buffer plus the result that collects syntax errors
struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    result: &'a mut CompilationResult,
    mode: ParseMode,
    eof: Token,
    nesting: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token], result: &'a mut CompilationResult, mode: ParseMode) -> Self {
        let end = tokens.last().map(|t| t.coordinate).unwrap_or_default();
        Self {
            tokens,
            pos: 0,
            result,
            mode,
            eof: Token {
                kind: TokenKind::Eof,
                text: String::new(),
                span: 0..0,
                coordinate: end,
            },
            nesting: 0,
        }
    }

    /// Enter one level of recursion; callers must call `ascend` on every path out
    fn descend(&mut self, kind: ParserErrorKind) -> ParseResult<()> {
        if self.nesting >= MAX_NESTING {
            return Err(ParserError::at(kind, self.coordinate()));
        }
        self.nesting += 1;
        Ok(())
    }

    fn ascend(&mut self) {
        self.nesting -= 1;
    }

    fn check_depth(&self, expr: &Expr) -> ParseResult<()> {
        if expr.depth() > MAX_EXPRESSION_DEPTH {
            return Err(ParserError::at(ParserErrorKind::ExpressionTooComplex, expr.coordinate));
        }
        Ok(())
    }

    // ==================== Token helpers ====================

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn kind(&self) -> TokenKind {
        self.current().kind
    }

    fn kind_at(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    fn at_eof(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn coordinate(&self) -> Coordinate {
        self.current().coordinate
    }

    fn previous_coordinate(&self) -> Coordinate {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.coordinate)
            .unwrap_or_else(|| self.coordinate())
    }

    fn found_text(&self) -> String {
        let token = self.current();
        if token.text.is_empty() {
            token.kind.describe().to_string()
        } else {
            token.text.clone()
        }
    }

    fn unexpected(&self, expected: &[&str]) -> ParserError {
        let kind = if self.check(TokenKind::Invalid) {
            ParserErrorKind::InvalidCharacter(self.found_text())
        } else {
            ParserErrorKind::UnexpectedToken {
                found: self.found_text(),
                expected: expected.iter().map(|s| s.to_string()).collect(),
            }
        };
        ParserError::at(kind, self.coordinate())
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(match kind {
            TokenKind::Semicolon => {
                ParserError::after(ParserErrorKind::MissingSemicolon, self.previous_coordinate())
            }
            TokenKind::RightParen => ParserError::at(ParserErrorKind::MissingRightParen, self.coordinate()),
            TokenKind::RightCurly => ParserError::at(ParserErrorKind::MissingRightCurly, self.coordinate()),
            other => self.unexpected(&[other.describe()]),
        })
    }

    fn expect_identifier(&mut self) -> ParseResult<(String, Coordinate)> {
        match self.kind() {
            TokenKind::Identifier => {
                let token = self.advance();
                Ok((token.text, token.coordinate))
            }
            TokenKind::Invalid => Err(self.unexpected(&[])),
            _ => Err(ParserError::at(
                ParserErrorKind::ExpectedIdentifier {
                    found: self.found_text(),
                },
                self.coordinate(),
            )),
        }
    }

    fn report(&mut self, err: ParserError) {
        self.result.record(Diagnostic::from(err));
    }

    // ==================== Names and types ====================

    /// Dotted name such as `geo.shapes.Point`
    fn qualified_name(&mut self) -> ParseResult<QualifiedName> {
        let (mut name, coordinate) = self.expect_identifier()?;
        while self.match_token(TokenKind::Dot) {
            let (part, _) = self.expect_identifier()?;
            name.push('.');
            name.push_str(&part);
        }
        Ok(QualifiedName { name, coordinate })
    }

    /// `qname ;`
    fn terminated_name(&mut self) -> ParseResult<QualifiedName> {
        let name = self.qualified_name()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(name)
    }

    fn type_ref(&mut self) -> ParseResult<TypeRef> {
        match self.kind() {
            TokenKind::Int | TokenKind::Boolean | TokenKind::Void => {
                let token = self.advance();
                Ok(TypeRef {
                    name: token.text,
                    coordinate: token.coordinate,
                })
            }
            TokenKind::Identifier => {
                let qname = self.qualified_name()?;
                Ok(TypeRef {
                    name: qname.name,
                    coordinate: qname.coordinate,
                })
            }
            _ => Err(self.unexpected(&["type"])),
        }
    }

    fn type_list(&mut self) -> ParseResult<Vec<TypeRef>> {
        let mut types = vec![self.type_ref()?];
        while self.match_token(TokenKind::Comma) {
            types.push(self.type_ref()?);
        }
        Ok(types)
    }

    // ==================== Recovery ====================

    /// Skip to the next `;` (consumed) or to something that starts a declaration
    fn recover_top_level(&mut self, force_progress: bool) {
        if force_progress {
            self.advance();
        }
        loop {
            match self.kind() {
                TokenKind::Eof
                | TokenKind::Import
                | TokenKind::Class
                | TokenKind::Interface
                | TokenKind::Abstract => return,
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip the rest of a broken member; a `{...}` block is skipped whole
    fn recover_member(&mut self) {
        loop {
            match self.kind() {
                TokenKind::Eof | TokenKind::RightCurly => return,
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::LeftCurly => {
                    self.skip_balanced();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip the rest of a broken statement, making progress from `start`
    fn recover_statement(&mut self, start: usize) {
        if self.pos == start && !matches!(self.kind(), TokenKind::RightCurly | TokenKind::Eof) {
            self.advance();
        }
        loop {
            match self.kind() {
                TokenKind::Eof | TokenKind::RightCurly => return,
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// From a `{`, skip past its matching `}` and return it
    fn skip_balanced(&mut self) -> Option<Token> {
        let mut depth = 0usize;
        loop {
            match self.kind() {
                TokenKind::Eof => return None,
                TokenKind::LeftCurly => depth += 1,
                TokenKind::RightCurly => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(self.advance());
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    // ==================== Units ====================

    fn compilation_unit(&mut self) -> UnitSyntax {
        let mut syntax = UnitSyntax::default();

        if self.match_token(TokenKind::Package) {
            match self.terminated_name() {
                Ok(name) => syntax.package = Some(name),
                Err(err) => {
                    self.report(err);
                    syntax.package_malformed = true;
                    self.recover_top_level(false);
                }
            }
        }

        while self.match_token(TokenKind::Import) {
            match self.terminated_name() {
                Ok(name) => syntax.imports.push(name),
                Err(err) => {
                    self.report(err);
                    self.recover_top_level(false);
                }
            }
        }

        while !self.at_eof() {
            match self.type_declaration() {
                Ok(decl) => syntax.types.push(decl),
                Err(err) => {
                    self.report(err);
                    self.recover_top_level(true);
                }
            }
        }

        syntax
    }

    fn module_declaration(&mut self) -> Option<ModuleDecl> {
        match self.module_header() {
            Ok(decl) => Some(decl),
            Err(err) => {
                self.report(err);
                None
            }
        }
    }

    fn module_header(&mut self) -> ParseResult<ModuleDecl> {
        if !(self.check(TokenKind::Identifier) && self.current().text == "module") {
            return Err(self.unexpected(&["module"]));
        }
        self.advance();

        let name = self.qualified_name()?;
        self.expect(TokenKind::LeftCurly)?;

        let mut decl = ModuleDecl {
            name,
            requires: Vec::new(),
            exports: Vec::new(),
        };

        loop {
            if self.match_token(TokenKind::RightCurly) {
                break;
            }
            if self.at_eof() {
                let err = ParserError::at(ParserErrorKind::MissingRightCurly, self.coordinate());
                self.report(err);
                break;
            }
            let start = self.pos;
            if let Err(err) = self.module_directive(&mut decl) {
                self.report(err);
                self.recover_statement(start);
            }
        }

        if !self.at_eof() {
            let err = ParserError::at(
                ParserErrorKind::TrailingInput {
                    found: self.found_text(),
                },
                self.coordinate(),
            );
            self.report(err);
        }

        Ok(decl)
    }

    fn module_directive(&mut self, decl: &mut ModuleDecl) -> ParseResult<()> {
        let word = if self.check(TokenKind::Identifier) {
            self.current().text.clone()
        } else {
            String::new()
        };

        match word.as_str() {
            "requires" => {
                self.advance();
                decl.requires.push(self.terminated_name()?);
            }
            "exports" => {
                self.advance();
                decl.exports.push(self.terminated_name()?);
            }
            _ => return Err(self.unexpected(&["requires", "exports"])),
        }
        Ok(())
    }

    // ==================== Types and members ====================

    fn type_declaration(&mut self) -> ParseResult<TypeDecl> {
        let is_abstract = self.match_token(TokenKind::Abstract);

        if self.match_token(TokenKind::Class) {
            let (name, coordinate) = self.expect_identifier()?;
            let superclass = if self.match_token(TokenKind::Extends) {
                Some(self.type_ref()?)
            } else {
                None
            };
            let interfaces = if self.match_token(TokenKind::Implements) {
                self.type_list()?
            } else {
                Vec::new()
            };
            let (fields, methods) = self.class_body(TypeKind::Class)?;

            Ok(TypeDecl {
                name,
                kind: TypeKind::Class,
                is_abstract,
                superclass,
                interfaces,
                fields,
                methods,
                coordinate,
            })
        } else if self.match_token(TokenKind::Interface) {
            let (name, coordinate) = self.expect_identifier()?;
            let interfaces = if self.match_token(TokenKind::Extends) {
                self.type_list()?
            } else {
                Vec::new()
            };
            let (fields, methods) = self.class_body(TypeKind::Interface)?;

            Ok(TypeDecl {
                name,
                kind: TypeKind::Interface,
                is_abstract: true,
                superclass: None,
                interfaces,
                fields,
                methods,
                coordinate,
            })
        } else {
            Err(self.unexpected(&["class", "interface"]))
        }
    }

    fn class_body(&mut self, kind: TypeKind) -> ParseResult<(Vec<FieldDecl>, Vec<MethodDecl>)> {
        self.expect(TokenKind::LeftCurly)?;

        let mut fields = Vec::new();
        let mut methods = Vec::new();

        loop {
            if self.match_token(TokenKind::RightCurly) {
                break;
            }
            if self.at_eof() {
                let err = ParserError::at(ParserErrorKind::MissingRightCurly, self.coordinate());
                self.report(err);
                break;
            }
            match self.member(kind) {
                Ok(Member::Field(field)) => fields.push(field),
                Ok(Member::Method(method)) => methods.push(method),
                Err(err) => {
                    self.report(err);
                    self.recover_member();
                }
            }
        }

        Ok((fields, methods))
    }

    fn member(&mut self, kind: TypeKind) -> ParseResult<Member> {
        let abstract_at = if self.check(TokenKind::Abstract) {
            Some(self.advance().coordinate)
        } else {
            None
        };
        let ty = self.type_ref()?;
        let (name, coordinate) = self.expect_identifier()?;

        if self.check(TokenKind::LeftParen) {
            let params = self.parameters()?;
            let body = if self.check(TokenKind::LeftCurly) {
                self.method_body()
            } else {
                self.expect(TokenKind::Semicolon)?;
                Body::Missing
            };

            return Ok(Member::Method(MethodDecl {
                name,
                return_type: ty,
                params,
                is_abstract: abstract_at.is_some() || kind == TypeKind::Interface,
                body,
                coordinate,
            }));
        }

        self.expect(TokenKind::Semicolon)?;
        if let Some(at) = abstract_at {
            let err = ParserError::at(
                ParserErrorKind::IllegalModifier {
                    modifier: "abstract".to_string(),
                    subject: format!("the field {name}"),
                },
                at,
            );
            self.report(err);
        }
        Ok(Member::Field(FieldDecl { ty, name, coordinate }))
    }

    fn parameters(&mut self) -> ParseResult<Vec<Param>> {
        self.expect(TokenKind::LeftParen)?;
        let mut params = Vec::new();
        if self.match_token(TokenKind::RightParen) {
            return Ok(params);
        }
        loop {
            let ty = self.type_ref()?;
            let (name, coordinate) = self.expect_identifier()?;
            params.push(Param { ty, name, coordinate });
            if self.match_token(TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RightParen)?;
            return Ok(params);
        }
    }

    fn method_body(&mut self) -> Body {
        match self.mode {
            ParseMode::Full => Body::Parsed(self.block()),
            ParseMode::Diet => {
                let open = self.current().clone();
                match self.skip_balanced() {
                    Some(close) => Body::Deferred {
                        range: open.span.start..close.span.end,
                        start: open.coordinate,
                    },
                    None => {
                        let err = ParserError::at(ParserErrorKind::MissingRightCurly, self.coordinate());
                        self.report(err);
                        Body::Parsed(Block {
                            stmts: Vec::new(),
                            coordinate: open.coordinate,
                        })
                    }
                }
            }
        }
    }

    // ==================== Statements ====================

    /// A method body re-scanned on its own
    fn body_block(&mut self) -> Block {
        if self.check(TokenKind::LeftCurly) {
            return self.block();
        }
        let coordinate = self.coordinate();
        let err = self.unexpected(&["{"]);
        self.report(err);
        Block {
            stmts: Vec::new(),
            coordinate,
        }
    }

    /// `{ stmt* }`; the current token must be `{`
    fn block(&mut self) -> Block {
        let coordinate = self.advance().coordinate;
        let mut stmts = Vec::new();

        loop {
            if self.match_token(TokenKind::RightCurly) {
                break;
            }
            if self.at_eof() {
                let err = ParserError::at(ParserErrorKind::MissingRightCurly, self.coordinate());
                self.report(err);
                break;
            }
            let start = self.pos;
            match self.statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    self.report(err);
                    self.recover_statement(start);
                }
            }
        }

        Block { stmts, coordinate }
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        self.descend(ParserErrorKind::NestingTooDeep)?;
        let stmt = self.nested_statement();
        self.ascend();
        stmt
    }

    fn nested_statement(&mut self) -> ParseResult<Stmt> {
        let coordinate = self.coordinate();
        let kind = match self.kind() {
            TokenKind::LeftCurly => StmtKind::Block(self.block()),
            TokenKind::Semicolon => {
                self.advance();
                StmtKind::Empty
            }
            TokenKind::If => {
                self.advance();
                self.expect(TokenKind::LeftParen)?;
                let condition = self.expression()?;
                self.expect(TokenKind::RightParen)?;
                let then_branch = Box::new(self.statement()?);
                let else_branch = if self.match_token(TokenKind::Else) {
                    Some(Box::new(self.statement()?))
                } else {
                    None
                };
                StmtKind::If {
                    condition,
                    then_branch,
                    else_branch,
                }
            }
            TokenKind::While => {
                self.advance();
                self.expect(TokenKind::LeftParen)?;
                let condition = self.expression()?;
                self.expect(TokenKind::RightParen)?;
                let body = Box::new(self.statement()?);
                StmtKind::While { condition, body }
            }
            TokenKind::Return => {
                self.advance();
                let value = if self.check(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.expression()?)
                };
                self.expect(TokenKind::Semicolon)?;
                StmtKind::Return(value)
            }
            TokenKind::Int | TokenKind::Boolean | TokenKind::Void => self.local_declaration()?,
            TokenKind::Identifier if self.looks_like_local_declaration() => self.local_declaration()?,
            _ => self.expression_statement()?,
        };
        Ok(Stmt { kind, coordinate })
    }

    /// `Name IDENT` or `a.b.Name IDENT` starts a local declaration
    fn looks_like_local_declaration(&self) -> bool {
        let mut offset = 1;
        while self.kind_at(offset) == TokenKind::Dot && self.kind_at(offset + 1) == TokenKind::Identifier {
            offset += 2;
        }
        self.kind_at(offset) == TokenKind::Identifier
    }

    fn local_declaration(&mut self) -> ParseResult<StmtKind> {
        let ty = self.type_ref()?;
        let (name, _) = self.expect_identifier()?;
        let init = if self.match_token(TokenKind::Equal) {
            Some(self.expression()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(StmtKind::Local { ty, name, init })
    }

    fn expression_statement(&mut self) -> ParseResult<StmtKind> {
        let target = self.expression()?;

        if self.match_token(TokenKind::Equal) {
            if !matches!(target.kind, ExprKind::Name(_) | ExprKind::Field { .. }) {
                return Err(ParserError::at(
                    ParserErrorKind::InvalidAssignmentTarget,
                    target.coordinate,
                ));
            }
            let value = self.expression()?;
            self.expect(TokenKind::Semicolon)?;
            return Ok(StmtKind::Assign { target, value });
        }

        if !matches!(target.kind, ExprKind::Call { .. } | ExprKind::New(_)) {
            return Err(ParserError::at(ParserErrorKind::NotAStatement, target.coordinate));
        }
        self.expect(TokenKind::Semicolon)?;
        Ok(StmtKind::Expr(target))
    }

    // ==================== Expressions ====================

    fn expression(&mut self) -> ParseResult<Expr> {
        self.descend(ParserErrorKind::ExpressionTooComplex)?;
        let expr = self.binary(0);
        self.ascend();
        let expr = expr?;
        self.check_depth(&expr)?;
        Ok(expr)
    }

    /// Precedence climbing over left-associative binary operators
    fn binary(&mut self, min_precedence: u8) -> ParseResult<Expr> {
        let mut left = self.unary()?;

        while let Some(op) = BinaryOp::from_token(self.kind()) {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.advance();
            let right = self.binary(precedence + 1)?;
            let coordinate = left.coordinate;
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                coordinate,
            );
            self.check_depth(&left)?;
        }

        Ok(left)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        let op = match self.kind() {
            TokenKind::Exclamation => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.postfix(),
        };
        let coordinate = self.advance().coordinate;
        self.descend(ParserErrorKind::ExpressionTooComplex)?;
        let operand = self.unary();
        self.ascend();
        let operand = operand?;
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            coordinate,
        ))
    }

    fn postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        while self.match_token(TokenKind::Dot) {
            let (name, coordinate) = self.expect_identifier()?;
            let kind = if self.check(TokenKind::LeftParen) {
                ExprKind::Call {
                    receiver: Some(Box::new(expr)),
                    name,
                    args: self.arguments()?,
                }
            } else {
                ExprKind::Field {
                    receiver: Box::new(expr),
                    name,
                }
            };
            expr = Expr::new(kind, coordinate);
            self.check_depth(&expr)?;
        }

        Ok(expr)
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        let coordinate = self.coordinate();
        let kind = match self.kind() {
            TokenKind::LiteralInteger => {
                let token = self.advance();
                let value = token.text.parse::<i64>().map_err(|_| {
                    ParserError::at(ParserErrorKind::InvalidNumberFormat(token.text.clone()), coordinate)
                })?;
                ExprKind::Int(value)
            }
            TokenKind::True => {
                self.advance();
                ExprKind::True
            }
            TokenKind::False => {
                self.advance();
                ExprKind::False
            }
            TokenKind::Null => {
                self.advance();
                ExprKind::Null
            }
            TokenKind::This => {
                self.advance();
                ExprKind::This
            }
            TokenKind::Identifier => {
                let name = self.advance().text;
                if self.check(TokenKind::LeftParen) {
                    ExprKind::Call {
                        receiver: None,
                        name,
                        args: self.arguments()?,
                    }
                } else {
                    ExprKind::Name(name)
                }
            }
            TokenKind::New => {
                self.advance();
                let qname = self.qualified_name()?;
                self.expect(TokenKind::LeftParen)?;
                self.expect(TokenKind::RightParen)?;
                ExprKind::New(TypeRef {
                    name: qname.name,
                    coordinate: qname.coordinate,
                })
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.expression()?;
                self.expect(TokenKind::RightParen)?;
                return Ok(inner);
            }
            _ => return Err(self.unexpected(&["expression"])),
        };
        Ok(Expr::new(kind, coordinate))
    }

    fn arguments(&mut self) -> ParseResult<Vec<Expr>> {
        self.expect(TokenKind::LeftParen)?;
        let mut args = Vec::new();
        if self.match_token(TokenKind::RightParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if self.match_token(TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RightParen)?;
            return Ok(args);
        }
    }
}
