use super::ast::{BinaryOp, Call, Command, CondBlock, Conditional, Expr, Literal, Method, Program};
use super::parsercore::Parser;
use super::token::TokenKind::*;
use crate::error::Error;
use crate::{check, expect, optional, repeat};
use arch::Ty;
use log::trace;
use std::io::Read;

impl<R: Read> Parser<R> {
    /// Parse a whole program. Errors swallowed by method/body recovery come back alongside the tree.
    pub fn parse(mut self) -> Result<(Program, Vec<Error>), Error> {
        let program = self.parse_program()?;
        Ok((program, self.geterrors()))
    }
}

impl<R: Read> Parser<R> {
    /// program = method { method }
    pub fn parse_program(&mut self) -> Result<Program, Error> {
        trace!("program");
        let mut methods = vec![self.parse_method()?];
        while !check!(self, EOF) {
            match self.parse_method() {
                Ok(method) => methods.push(method),
                Err(err) => {
                    self.error(err);
                    break;
                }
            }
        }
        Ok(Program(methods))
    }

    /// method = type ident "(" varList ")" "{" body "}"
    pub fn parse_method(&mut self) -> Result<Method, Error> {
        trace!("method at {}", self.peek().pos);
        let ret = self.parse_type()?;
        let name = self.parse_ident()?;
        expect!(self, LParen, "`(`")?;
        let params = self.parse_var_list()?;
        expect!(self, RParen, "`)`")?;
        let body = self.parse_block()?;
        Ok(Method {
            ret,
            name,
            params,
            body,
        })
    }

    /// type = "int" | "double" | "void"
    pub fn parse_type(&mut self) -> Result<Ty, Error> {
        let ty = match self.peek().kind {
            KwInt => Ty::Int,
            KwDouble => Ty::Double,
            KwVoid => Ty::Void,
            _ => return Err(Error::unexpected("Type (int, double or void)", self.peek())),
        };
        self.advance()?;
        Ok(ty)
    }

    /// varList = [ type ident { "," type ident } ]
    pub fn parse_var_list(&mut self) -> Result<Vec<(Ty, String)>, Error> {
        trace!("varList");
        let mut vars = Vec::new();
        if !self.peek().kind.is_type() {
            return Ok(vars);
        }
        vars.push(self.parse_var()?);
        while optional!(self, Comma).is_some() {
            vars.push(self.parse_var()?);
        }
        Ok(vars)
    }

    /// type ident
    fn parse_var(&mut self) -> Result<(Ty, String), Error> {
        let ty = self.parse_type()?;
        let name = self.parse_ident()?;
        Ok((ty, name))
    }

    /// "{" body "}"
    fn parse_block(&mut self) -> Result<Vec<Command>, Error> {
        expect!(self, LCurly, "`{`")?;
        let body = self.parse_body()?;
        expect!(self, RCurly, "`}`")?;
        Ok(body)
    }

    /// body = [ command { ";" command } ]
    ///
    /// A `;` directly before `}` closes the body. A command that fails after
    /// a `;` is recorded and ends the body.
    pub fn parse_body(&mut self) -> Result<Vec<Command>, Error> {
        trace!("body at {}", self.peek().pos);
        let mut body = Vec::new();
        if check!(self, RCurly) {
            return Ok(body);
        }
        body.push(self.parse_command()?);
        while optional!(self, Semicolon).is_some() {
            if check!(self, RCurly) {
                break;
            }
            match self.parse_command() {
                Ok(command) => body.push(command),
                Err(err) => {
                    self.error(err);
                    break;
                }
            }
        }
        Ok(body)
    }

    /// command = ident "(" paramList ")"
    ///         | ident "=" expression
    ///         | "return" [ expression ]
    ///         | "print" expression
    ///         | type ident
    ///         | conditional
    pub fn parse_command(&mut self) -> Result<Command, Error> {
        trace!("command at {}", self.peek().pos);
        match &self.peek().kind {
            // Call or assignment: ident ( "(" paramList ")" | "=" expression )
            Ident(_) => {
                let name = self.parse_ident()?;
                if check!(self, LParen) {
                    let args = self.parse_param_list()?;
                    Ok(Command::Call(Call(name, args)))
                } else {
                    expect!(self, Equal, "`=` or `(`")?;
                    let value = self.parse_expression()?;
                    Ok(Command::Assign(name, value))
                }
            }

            // Return: "return" [ expression ]
            KwReturn => {
                expect!(self, KwReturn)?;
                if check!(self, Semicolon | RCurly) {
                    Ok(Command::Return(None))
                } else {
                    Ok(Command::Return(Some(self.parse_expression()?)))
                }
            }

            // Print: "print" expression
            KwPrint => {
                expect!(self, KwPrint)?;
                Ok(Command::Print(self.parse_expression()?))
            }

            // Conditional: "if" ...
            KwIf => Ok(Command::Cond(self.parse_conditional()?)),

            // Declaration: type ident
            kind if kind.is_type() => {
                let (ty, name) = self.parse_var()?;
                Ok(Command::Declare(ty, name))
            }

            _ => Err(Error::unexpected("Command", self.peek())),
        }
    }

    /// conditional = "if" "(" expression ")" "{" body "}"
    ///               { "elseif" "(" expression ")" "{" body "}" }
    ///               [ "else" "{" body "}" ]
    pub fn parse_conditional(&mut self) -> Result<Conditional, Error> {
        trace!("conditional at {}", self.peek().pos);
        expect!(self, KwIf, "`if`")?;
        let if_block = self.parse_cond_block()?;
        let mut elseif_blocks = Vec::new();
        while optional!(self, KwElseIf).is_some() {
            elseif_blocks.push(self.parse_cond_block()?);
        }
        let else_block = optional!(self, KwElse, self.parse_block()?);
        Ok(Conditional {
            if_block,
            elseif_blocks,
            else_block,
        })
    }

    /// "(" expression ")" "{" body "}"
    fn parse_cond_block(&mut self) -> Result<CondBlock, Error> {
        expect!(self, LParen, "`(`")?;
        let cond = self.parse_expression()?;
        expect!(self, RParen, "`)`")?;
        let body = self.parse_block()?;
        Ok(CondBlock(cond, body))
    }

    /// paramList = "(" [ expression { "," expression } ] ")"
    pub fn parse_param_list(&mut self) -> Result<Vec<Expr>, Error> {
        expect!(self, LParen, "`(`")?;
        let args = repeat!(self, self.parse_expression(), Comma, RParen);
        expect!(self, RParen, "`)`")?;
        Ok(args)
    }

    /// expression = term { ( "+" | "-" | "||" ) term }
    pub fn parse_expression(&mut self) -> Result<Expr, Error> {
        let mut lhs = self.parse_term()?;
        while check!(self, Plus | Minus | PipePipe) {
            let op = self.parse_operator()?;
            let rhs = self.parse_term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    /// term = factor { ( "*" | "/" | "&&" ) factor }
    pub fn parse_term(&mut self) -> Result<Expr, Error> {
        let mut lhs = self.parse_factor()?;
        while check!(self, Star | Slash | AmpAmp) {
            let op = self.parse_operator()?;
            let rhs = self.parse_factor()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    /// factor = power [ "^" factor ]
    pub fn parse_factor(&mut self) -> Result<Expr, Error> {
        let base = self.parse_power()?;
        if optional!(self, Caret).is_some() {
            let exponent = self.parse_factor()?;
            return Ok(Expr::binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    /// power = "-" atom | "!" atom | atom
    pub fn parse_power(&mut self) -> Result<Expr, Error> {
        match self.peek().kind {
            // Negation: "-" atom
            Minus => {
                expect!(self, Minus)?;
                Ok(Expr::Neg(Box::new(self.parse_atom()?)))
            }
            // Logical not: "!" atom
            Excl => {
                expect!(self, Excl)?;
                Ok(Expr::Not(Box::new(self.parse_atom()?)))
            }
            _ => self.parse_atom(),
        }
    }

    /// atom = ident [ paramList ]
    ///      | integer | double
    ///      | "(" expression ")" [ cmp "(" expression ")" ]
    pub fn parse_atom(&mut self) -> Result<Expr, Error> {
        match &self.peek().kind {
            // Variable or call: ident [ paramList ]
            Ident(_) => {
                let name = self.parse_ident()?;
                if check!(self, LParen) {
                    let args = self.parse_param_list()?;
                    Ok(Expr::Call(Call(name, args)))
                } else {
                    Ok(Expr::Var(name))
                }
            }

            // Integer literal
            Integer(text) => {
                let text = text.clone();
                expect!(self, Integer(_))?;
                Ok(Expr::Literal(Literal::Int(text)))
            }

            // Double literal
            Double(text) => {
                let text = text.clone();
                expect!(self, Double(_))?;
                Ok(Expr::Literal(Literal::Double(text)))
            }

            // Parenthesized expression, optionally compared: "(" expression ")" [ cmp "(" expression ")" ]
            LParen => {
                expect!(self, LParen)?;
                let inner = self.parse_expression()?;
                expect!(self, RParen, "`)`")?;
                if !self.peek().kind.is_comparison() {
                    return Ok(inner);
                }
                let op = self.parse_operator()?;
                expect!(self, LParen, "`(`")?;
                let rhs = self.parse_expression()?;
                expect!(self, RParen, "`)`")?;
                Ok(Expr::binary(op, inner, rhs))
            }

            _ => Err(Error::unexpected("Expression", self.peek())),
        }
    }

    /// ident
    pub fn parse_ident(&mut self) -> Result<String, Error> {
        match &self.peek().kind {
            Ident(name) => {
                let name = name.clone();
                self.advance()?;
                Ok(name)
            }
            _ => Err(Error::unexpected("Identifier", self.peek())),
        }
    }

    /// Consume a binary operator token
    fn parse_operator(&mut self) -> Result<BinaryOp, Error> {
        let token = self.advance()?;
        BinaryOp::from_token(&token.kind).ok_or_else(|| Error::unexpected("Operator", &token))
    }
}
