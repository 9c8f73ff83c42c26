//! Recursive-descent compiler for a single Jack class.
//!
//! One input file is one class. The engine walks the grammar with one token
//! of lookahead and emits VM code as it goes; there is no AST. Expressions
//! are flattened left-to-right with no operator precedence, per the Jack
//! language definition.

use crate::error::{Error, Result};
use crate::span::Span;
use crate::vm::{Segment, VmOp};

use super::symbol_table::{SymbolTable, VarKind};
use super::token::{Keyword, Token};
use super::tokenizer::Tokenizer;
use super::vm_writer::VmWriter;

const OPS: &[char] = &['+', '-', '*', '/', '&', '|', '<', '>', '='];

/// Compile one Jack class into VM code.
pub fn compile(source: &str) -> Result<String> {
    let mut engine = CompilationEngine::new(source)?;
    engine.compile_class()?;
    Ok(engine.writer.finish())
}

struct CompilationEngine<'src> {
    tokens: Tokenizer<'src>,
    symbols: SymbolTable,
    writer: VmWriter,
    class_name: String,
    /// Per-subroutine label counters; both reset at subroutine entry.
    while_counter: u32,
    if_counter: u32,
}

impl<'src> CompilationEngine<'src> {
    fn new(source: &'src str) -> Result<Self> {
        let mut tokens = Tokenizer::new(source)?;
        if !tokens.has_more_tokens() {
            return Err(Error::syntax("no tokens found in input", Span::dummy(), 1));
        }
        tokens.advance()?;
        Ok(Self {
            tokens,
            symbols: SymbolTable::new(),
            writer: VmWriter::new(),
            class_name: String::new(),
            while_counter: 0,
            if_counter: 0,
        })
    }

    // --- Grammar: class structure ---

    /// class := 'class' ident '{' classVarDec* subroutineDec* '}'
    fn compile_class(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Class)?;
        self.class_name = self.expect_identifier()?;
        self.expect_symbol('{')?;

        while self.at_keyword(Keyword::Static) || self.at_keyword(Keyword::Field) {
            self.compile_class_var_dec()?;
        }
        while self.at_keyword(Keyword::Constructor)
            || self.at_keyword(Keyword::Function)
            || self.at_keyword(Keyword::Method)
        {
            self.compile_subroutine()?;
        }

        // The closing brace is the last token of the unit, so it is checked
        // without advancing past it.
        if !self.at_symbol('}') {
            return Err(self.syntax_error("'}'"));
        }
        if self.tokens.has_more_tokens() {
            self.tokens.advance()?;
            return Err(self.syntax_error("end of input after class body"));
        }
        Ok(())
    }

    /// classVarDec := ('static'|'field') type ident (',' ident)* ';'
    fn compile_class_var_dec(&mut self) -> Result<()> {
        let kind = if self.at_keyword(Keyword::Static) {
            VarKind::Static
        } else {
            VarKind::Field
        };
        self.tokens.advance()?;
        let ty = self.compile_type(false)?;
        loop {
            let location = self.location();
            let name = self.expect_identifier()?;
            self.symbols
                .define(&name, &ty, kind)
                .map_err(|e| e.at(location.0, location.1))?;
            if !self.eat_symbol(',')? {
                break;
            }
        }
        self.expect_symbol(';')
    }

    /// subroutineDec := ('constructor'|'function'|'method')
    ///                  (type|'void') ident '(' paramList ')' subBody
    fn compile_subroutine(&mut self) -> Result<()> {
        let kind = self.tokens.keyword()?;
        self.tokens.advance()?;
        self.compile_type(true)?; // return type; only its grammar matters
        let name = self.expect_identifier()?;

        self.symbols.start_subroutine();
        self.while_counter = 0;
        self.if_counter = 0;
        if kind == Keyword::Method {
            let class_name = self.class_name.clone();
            self.symbols.define("this", &class_name, VarKind::Arg)?;
        }

        self.expect_symbol('(')?;
        self.compile_parameter_list()?;
        self.expect_symbol(')')?;

        self.expect_symbol('{')?;
        while self.at_keyword(Keyword::Var) {
            self.compile_var_dec()?;
        }

        let full_name = format!("{}.{}", self.class_name, name);
        self.writer
            .write_function(&full_name, self.symbols.var_count(VarKind::Var));
        match kind {
            Keyword::Constructor => {
                self.writer
                    .write_push(Segment::Constant, self.symbols.var_count(VarKind::Field))?;
                self.writer.write_call("Memory.alloc", 1);
                self.writer.write_pop(Segment::Pointer, 0)?;
            }
            Keyword::Method => {
                self.writer.write_push(Segment::Argument, 0)?;
                self.writer.write_pop(Segment::Pointer, 0)?;
            }
            _ => {}
        }

        self.compile_statements()?;
        self.expect_symbol('}')
    }

    /// paramList := (type ident (',' type ident)*)?
    fn compile_parameter_list(&mut self) -> Result<()> {
        if !self.at_type_start() {
            return Ok(());
        }
        loop {
            let ty = self.compile_type(false)?;
            let location = self.location();
            let name = self.expect_identifier()?;
            self.symbols
                .define(&name, &ty, VarKind::Arg)
                .map_err(|e| e.at(location.0, location.1))?;
            if !self.eat_symbol(',')? {
                break;
            }
        }
        Ok(())
    }

    /// varDec := 'var' type ident (',' ident)* ';'
    fn compile_var_dec(&mut self) -> Result<()> {
        self.tokens.advance()?; // 'var'
        let ty = self.compile_type(false)?;
        loop {
            let location = self.location();
            let name = self.expect_identifier()?;
            self.symbols
                .define(&name, &ty, VarKind::Var)
                .map_err(|e| e.at(location.0, location.1))?;
            if !self.eat_symbol(',')? {
                break;
            }
        }
        self.expect_symbol(';')
    }

    // --- Grammar: statements ---

    fn compile_statements(&mut self) -> Result<()> {
        loop {
            if self.at_keyword(Keyword::Let) {
                self.compile_let()?;
            } else if self.at_keyword(Keyword::If) {
                self.compile_if()?;
            } else if self.at_keyword(Keyword::While) {
                self.compile_while()?;
            } else if self.at_keyword(Keyword::Do) {
                self.compile_do()?;
            } else if self.at_keyword(Keyword::Return) {
                self.compile_return()?;
            } else {
                return Ok(());
            }
        }
    }

    /// let := 'let' ident ('[' expr ']')? '=' expr ';'
    fn compile_let(&mut self) -> Result<()> {
        self.tokens.advance()?; // 'let'
        let location = self.location();
        let name = self.expect_identifier()?;

        let indexed = self.at_symbol('[');
        if indexed {
            self.push_variable(&name)
                .map_err(|e| e.at(location.0, location.1))?;
            self.tokens.advance()?; // '['
            self.compile_expression()?;
            self.expect_symbol(']')?;
            self.writer.write_arithmetic(VmOp::Add);
        }

        self.expect_symbol('=')?;
        self.compile_expression()?;
        self.expect_symbol(';')?;

        if indexed {
            // Park the value in temp 0 before repointing `that`: the
            // right-hand side may itself have used pointer 1.
            self.writer.write_pop(Segment::Temp, 0)?;
            self.writer.write_pop(Segment::Pointer, 1)?;
            self.writer.write_push(Segment::Temp, 0)?;
            self.writer.write_pop(Segment::That, 0)?;
        } else {
            let segment = self
                .symbols
                .segment_of(&name)
                .map_err(|e| e.at(location.0, location.1))?;
            let index = self.symbols.index_of(&name)?;
            self.writer.write_pop(segment, index)?;
        }
        Ok(())
    }

    /// if := 'if' '(' expr ')' '{' statements '}' ('else' '{' statements '}')?
    fn compile_if(&mut self) -> Result<()> {
        self.tokens.advance()?; // 'if'
        let i = self.if_counter;
        self.if_counter += 1;

        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;

        self.writer.write_if(&format!("IF_TRUE{}", i));
        self.writer.write_goto(&format!("IF_FALSE{}", i));
        self.writer.write_label(&format!("IF_TRUE{}", i));

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;

        if self.at_keyword(Keyword::Else) {
            self.tokens.advance()?;
            self.writer.write_goto(&format!("IF_END{}", i));
            self.writer.write_label(&format!("IF_FALSE{}", i));
            self.expect_symbol('{')?;
            self.compile_statements()?;
            self.expect_symbol('}')?;
            self.writer.write_label(&format!("IF_END{}", i));
        } else {
            self.writer.write_label(&format!("IF_FALSE{}", i));
        }
        Ok(())
    }

    /// while := 'while' '(' expr ')' '{' statements '}'
    fn compile_while(&mut self) -> Result<()> {
        self.tokens.advance()?; // 'while'
        let i = self.while_counter;
        self.while_counter += 1;

        self.writer.write_label(&format!("WHILE_EXP{}", i));
        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.writer.write_arithmetic(VmOp::Not);
        self.writer.write_if(&format!("WHILE_END{}", i));

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;

        self.writer.write_goto(&format!("WHILE_EXP{}", i));
        self.writer.write_label(&format!("WHILE_END{}", i));
        Ok(())
    }

    /// do := 'do' subCall ';'
    fn compile_do(&mut self) -> Result<()> {
        self.tokens.advance()?; // 'do'
        let name = self.expect_identifier()?;
        self.compile_subroutine_call(name)?;
        self.expect_symbol(';')?;
        // discard the returned value
        self.writer.write_pop(Segment::Temp, 0)
    }

    /// return := 'return' expr? ';'
    fn compile_return(&mut self) -> Result<()> {
        self.tokens.advance()?; // 'return'
        if self.at_symbol(';') {
            self.writer.write_push(Segment::Constant, 0)?;
        } else {
            self.compile_expression()?;
        }
        self.expect_symbol(';')?;
        self.writer.write_return();
        Ok(())
    }

    // --- Grammar: expressions ---

    /// expr := term (op term)*, flattened left-to-right with no precedence.
    fn compile_expression(&mut self) -> Result<()> {
        self.compile_term()?;
        loop {
            let op = match self.tokens.token() {
                Ok(Token::Symbol(ch)) if OPS.contains(ch) => *ch,
                _ => break,
            };
            self.tokens.advance()?;
            self.compile_term()?;
            self.emit_op(op);
        }
        Ok(())
    }

    fn emit_op(&mut self, op: char) {
        match op {
            '+' => self.writer.write_arithmetic(VmOp::Add),
            '-' => self.writer.write_arithmetic(VmOp::Sub),
            '&' => self.writer.write_arithmetic(VmOp::And),
            '|' => self.writer.write_arithmetic(VmOp::Or),
            '<' => self.writer.write_arithmetic(VmOp::Lt),
            '>' => self.writer.write_arithmetic(VmOp::Gt),
            '=' => self.writer.write_arithmetic(VmOp::Eq),
            '*' => self.writer.write_call("Math.multiply", 2),
            '/' => self.writer.write_call("Math.divide", 2),
            _ => unreachable!("'{}' is not a binary operator", op),
        }
    }

    fn compile_term(&mut self) -> Result<()> {
        match self.tokens.token()?.clone() {
            Token::IntConst(value) => {
                self.writer.write_push(Segment::Constant, value)?;
                self.tokens.advance()
            }
            Token::StringConst(text) => {
                self.compile_string_constant(&text)?;
                self.tokens.advance()
            }
            Token::Keyword(Keyword::True) => {
                self.writer.write_push(Segment::Constant, 0)?;
                self.writer.write_arithmetic(VmOp::Not);
                self.tokens.advance()
            }
            Token::Keyword(Keyword::False) | Token::Keyword(Keyword::Null) => {
                self.writer.write_push(Segment::Constant, 0)?;
                self.tokens.advance()
            }
            Token::Keyword(Keyword::This) => {
                self.writer.write_push(Segment::Pointer, 0)?;
                self.tokens.advance()
            }
            Token::Symbol('(') => {
                self.tokens.advance()?;
                self.compile_expression()?;
                self.expect_symbol(')')
            }
            Token::Symbol('-') => {
                self.tokens.advance()?;
                self.compile_term()?;
                self.writer.write_arithmetic(VmOp::Neg);
                Ok(())
            }
            Token::Symbol('~') => {
                self.tokens.advance()?;
                self.compile_term()?;
                self.writer.write_arithmetic(VmOp::Not);
                Ok(())
            }
            Token::Identifier(name) => {
                let location = self.location();
                self.tokens.advance()?;
                self.compile_term_identifier(name, location)
            }
            _ => Err(self.syntax_error("an expression term")),
        }
    }

    /// A term that begins with an identifier: a variable reference, an array
    /// read, or a subroutine call. Identifiers that are not defined
    /// variables are assumed to name a class heading a call.
    fn compile_term_identifier(&mut self, name: String, location: (Span, u32)) -> Result<()> {
        if self.at_symbol('(') || self.at_symbol('.') {
            return self.compile_subroutine_call(name);
        }
        if self.symbols.kind_of(&name).is_none() {
            return self.compile_subroutine_call(name);
        }

        if self.at_symbol('[') {
            self.push_variable(&name)
                .map_err(|e| e.at(location.0, location.1))?;
            self.tokens.advance()?; // '['
            self.compile_expression()?;
            self.expect_symbol(']')?;
            self.writer.write_arithmetic(VmOp::Add);
            self.writer.write_pop(Segment::Pointer, 1)?;
            self.writer.write_push(Segment::That, 0)?;
        } else {
            self.push_variable(&name)
                .map_err(|e| e.at(location.0, location.1))?;
        }
        Ok(())
    }

    /// subCall := ident '(' exprList ')' | ident '.' ident '(' exprList ')'
    ///
    /// `Foo(...)` is an implicit method call on the current object.
    /// `X.Foo(...)` is a method call iff `X` is a defined variable;
    /// otherwise `X` is taken to be a class name. A symbol-table hit is the
    /// entire disambiguation; there is no type check.
    fn compile_subroutine_call(&mut self, first: String) -> Result<()> {
        let (callee, this_pushed) = if self.at_symbol('.') {
            self.tokens.advance()?; // '.'
            let method = self.expect_identifier()?;
            if self.symbols.kind_of(&first).is_some() {
                let ty = self.symbols.type_of(&first)?.to_string();
                self.push_variable(&first)?;
                (format!("{}.{}", ty, method), true)
            } else {
                (format!("{}.{}", first, method), false)
            }
        } else {
            self.writer.write_push(Segment::Pointer, 0)?;
            (format!("{}.{}", self.class_name, first), true)
        };

        self.expect_symbol('(')?;
        let args = self.compile_expression_list()?;
        self.expect_symbol(')')?;

        self.writer
            .write_call(&callee, args + if this_pushed { 1 } else { 0 });
        Ok(())
    }

    /// exprList := (expr (',' expr)*)?  Returns the expression count.
    fn compile_expression_list(&mut self) -> Result<u16> {
        let mut count = 0;
        if !self.at_symbol(')') {
            loop {
                self.compile_expression()?;
                count += 1;
                if !self.eat_symbol(',')? {
                    break;
                }
            }
        }
        Ok(count)
    }

    /// A string literal builds a String object one character at a time.
    fn compile_string_constant(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_push(Segment::Constant, text.chars().count() as u16)?;
        self.writer.write_call("String.new", 1);
        for ch in text.chars() {
            self.writer.write_push(Segment::Constant, ch as u16)?;
            self.writer.write_call("String.appendChar", 2);
        }
        Ok(())
    }

    // --- Token helpers ---

    /// type := 'int' | 'char' | 'boolean' | ident, plus 'void' when allowed.
    fn compile_type(&mut self, allow_void: bool) -> Result<String> {
        let ty = match self.tokens.token()? {
            Token::Keyword(Keyword::Int) => "int".to_string(),
            Token::Keyword(Keyword::Char) => "char".to_string(),
            Token::Keyword(Keyword::Boolean) => "boolean".to_string(),
            Token::Keyword(Keyword::Void) if allow_void => "void".to_string(),
            Token::Identifier(name) => name.clone(),
            _ => {
                let expected = if allow_void {
                    "a type ('int', 'char', 'boolean', 'void', or a class name)"
                } else {
                    "a type ('int', 'char', 'boolean', or a class name)"
                };
                return Err(self.syntax_error(expected));
            }
        };
        self.tokens.advance()?;
        Ok(ty)
    }

    fn at_type_start(&self) -> bool {
        matches!(
            self.tokens.token(),
            Ok(Token::Keyword(Keyword::Int))
                | Ok(Token::Keyword(Keyword::Char))
                | Ok(Token::Keyword(Keyword::Boolean))
                | Ok(Token::Identifier(_))
        )
    }

    fn at_symbol(&self, ch: char) -> bool {
        matches!(self.tokens.token(), Ok(Token::Symbol(c)) if *c == ch)
    }

    fn at_keyword(&self, kw: Keyword) -> bool {
        matches!(self.tokens.token(), Ok(Token::Keyword(k)) if *k == kw)
    }

    fn expect_symbol(&mut self, ch: char) -> Result<()> {
        if self.at_symbol(ch) {
            self.tokens.advance()
        } else {
            Err(self.syntax_error(&format!("'{}'", ch)))
        }
    }

    fn eat_symbol(&mut self, ch: char) -> Result<bool> {
        if self.at_symbol(ch) {
            self.tokens.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<()> {
        if self.at_keyword(kw) {
            self.tokens.advance()
        } else {
            Err(self.syntax_error(&format!("'{}'", kw.as_str())))
        }
    }

    fn expect_identifier(&mut self) -> Result<String> {
        match self.tokens.token()? {
            Token::Identifier(name) => {
                let name = name.clone();
                self.tokens.advance()?;
                Ok(name)
            }
            _ => Err(self.syntax_error("an identifier")),
        }
    }

    fn push_variable(&mut self, name: &str) -> Result<()> {
        let segment = self.symbols.segment_of(name)?;
        let index = self.symbols.index_of(name)?;
        self.writer.write_push(segment, index)
    }

    fn location(&self) -> (Span, u32) {
        (self.tokens.span(), self.tokens.line())
    }

    fn syntax_error(&self, expected: &str) -> Error {
        let found = self
            .tokens
            .token()
            .map(|t| t.description())
            .unwrap_or_else(|_| "end of input".to_string());
        Error::syntax(
            format!("expected {}, found {}", expected, found),
            self.tokens.span(),
            self.tokens.line(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(vm: &str) -> Vec<String> {
        vm.lines().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_constructor_allocates_fields() {
        let vm = compile(
            "class Point {\n\
             field int x, y;\n\
             constructor Point new(int ax, int ay) {\n\
                 let x = ax;\n\
                 let y = ay;\n\
                 return this;\n\
             }\n\
             }",
        )
        .unwrap();
        let lines = lines(&vm);
        assert_eq!(
            &lines[..4],
            &[
                "function Point.new 0",
                "push constant 2",
                "call Memory.alloc 1",
                "pop pointer 0",
            ]
        );
        assert_eq!(&lines[lines.len() - 2..], &["push pointer 0", "return"]);
        assert!(vm.contains("push argument 0\npop this 0"));
        assert!(vm.contains("push argument 1\npop this 1"));
    }

    #[test]
    fn test_method_array_read() {
        let vm = compile(
            "class A {\n\
             field Array a;\n\
             method int peek(int i) {\n\
                 return a[i];\n\
             }\n\
             }",
        )
        .unwrap();
        assert_eq!(
            lines(&vm),
            vec![
                "function A.peek 0",
                "push argument 0",
                "pop pointer 0",
                "push this 0",
                "push argument 1",
                "add",
                "pop pointer 1",
                "push that 0",
                "return",
            ]
        );
    }

    #[test]
    fn test_while_label_shape() {
        let vm = compile(
            "class Main {\n\
             method void run() {\n\
                 var int i;\n\
                 while (i < 10) {\n\
                     let i = i + 1;\n\
                 }\n\
                 return;\n\
             }\n\
             }",
        )
        .unwrap();
        let body: Vec<&str> = vm.lines().skip(3).collect();
        assert_eq!(
            body,
            vec![
                "label WHILE_EXP0",
                "push local 0",
                "push constant 10",
                "lt",
                "not",
                "if-goto WHILE_END0",
                "push local 0",
                "push constant 1",
                "add",
                "pop local 0",
                "goto WHILE_EXP0",
                "label WHILE_END0",
                "push constant 0",
                "return",
            ]
        );
    }

    #[test]
    fn test_if_else_label_shape() {
        let vm = compile(
            "class Main {\n\
             function int pick(boolean b) {\n\
                 if (b) { return 1; } else { return 2; }\n\
             }\n\
             }",
        )
        .unwrap();
        let body: Vec<&str> = vm.lines().collect();
        assert_eq!(
            body,
            vec![
                "function Main.pick 0",
                "push argument 0",
                "if-goto IF_TRUE0",
                "goto IF_FALSE0",
                "label IF_TRUE0",
                "push constant 1",
                "return",
                "goto IF_END0",
                "label IF_FALSE0",
                "push constant 2",
                "return",
                "label IF_END0",
            ]
        );
    }

    #[test]
    fn test_if_without_else() {
        let vm = compile(
            "class Main {\n\
             function void f(boolean b) {\n\
                 if (b) { do Output.println(); }\n\
                 return;\n\
             }\n\
             }",
        )
        .unwrap();
        assert!(vm.contains("label IF_TRUE0"));
        assert!(vm.contains("label IF_FALSE0"));
        assert!(!vm.contains("IF_END0"));
    }

    #[test]
    fn test_label_counters_reset_per_subroutine() {
        let vm = compile(
            "class Main {\n\
             function void a() { while (true) { } return; }\n\
             function void b() { while (true) { } return; }\n\
             }",
        )
        .unwrap();
        let count = vm.matches("label WHILE_EXP0").count();
        assert_eq!(count, 2);
        assert!(!vm.contains("WHILE_EXP1"));
    }

    #[test]
    fn test_nested_whiles_get_distinct_labels() {
        let vm = compile(
            "class Main {\n\
             function void f() {\n\
                 while (true) { while (false) { } }\n\
                 return;\n\
             }\n\
             }",
        )
        .unwrap();
        assert!(vm.contains("WHILE_EXP0"));
        assert!(vm.contains("WHILE_EXP1"));
        assert!(vm.contains("WHILE_END1"));
    }

    #[test]
    fn test_expression_has_no_precedence() {
        let vm = compile(
            "class Main {\n\
             function int f() { return 1 + 2 * 3; }\n\
             }",
        )
        .unwrap();
        let body: Vec<&str> = vm.lines().skip(1).collect();
        assert_eq!(
            body,
            vec![
                "push constant 1",
                "push constant 2",
                "add",
                "push constant 3",
                "call Math.multiply 2",
                "return",
            ]
        );
    }

    #[test]
    fn test_parenthesized_expression() {
        let vm = compile(
            "class Main {\n\
             function int f(int a, int b) { return a * (b + 1); }\n\
             }",
        )
        .unwrap();
        let body: Vec<&str> = vm.lines().skip(1).collect();
        assert_eq!(
            body,
            vec![
                "push argument 0",
                "push argument 1",
                "push constant 1",
                "add",
                "call Math.multiply 2",
                "return",
            ]
        );
    }

    #[test]
    fn test_keyword_constants() {
        let vm = compile(
            "class Main {\n\
             function void f() {\n\
                 var boolean b;\n\
                 let b = true;\n\
                 let b = false;\n\
                 let b = null;\n\
                 return;\n\
             }\n\
             }",
        )
        .unwrap();
        assert!(vm.contains("push constant 0\nnot\npop local 0"));
        let zero_pushes = vm.matches("push constant 0").count();
        // true, false, null, and the void return value
        assert_eq!(zero_pushes, 4);
    }

    #[test]
    fn test_unary_operators_follow_term() {
        let vm = compile(
            "class Main {\n\
             function int f(int a) { return -a + ~a; }\n\
             }",
        )
        .unwrap();
        let body: Vec<&str> = vm.lines().skip(1).collect();
        assert_eq!(
            body,
            vec![
                "push argument 0",
                "neg",
                "push argument 0",
                "not",
                "add",
                "return",
            ]
        );
    }

    #[test]
    fn test_string_constant_expansion() {
        let vm = compile(
            "class Main {\n\
             function void f() {\n\
                 do Output.printString(\"Hi\");\n\
                 return;\n\
             }\n\
             }",
        )
        .unwrap();
        assert!(vm.contains(
            "push constant 2\n\
             call String.new 1\n\
             push constant 72\n\
             call String.appendChar 2\n\
             push constant 105\n\
             call String.appendChar 2"
        ));
    }

    #[test]
    fn test_do_discards_return_value() {
        let vm = compile(
            "class Main {\n\
             function void f() { do Output.println(); return; }\n\
             }",
        )
        .unwrap();
        assert!(vm.contains("call Output.println 0\npop temp 0"));
    }

    #[test]
    fn test_implicit_method_call_on_this() {
        let vm = compile(
            "class Main {\n\
             method void f() { do g(1); return; }\n\
             method void g(int x) { return; }\n\
             }",
        )
        .unwrap();
        assert!(vm.contains("push pointer 0\npush constant 1\ncall Main.g 2"));
    }

    #[test]
    fn test_method_call_on_variable() {
        let vm = compile(
            "class Main {\n\
             function void f() {\n\
                 var Point p;\n\
                 do p.move(1, 2);\n\
                 return;\n\
             }\n\
             }",
        )
        .unwrap();
        // p is pushed as the receiver, so the call carries 3 arguments
        assert!(vm.contains(
            "push local 0\npush constant 1\npush constant 2\ncall Point.move 3"
        ));
    }

    #[test]
    fn test_class_function_call_has_no_receiver() {
        let vm = compile(
            "class Main {\n\
             function void f() { do Output.printInt(3); return; }\n\
             }",
        )
        .unwrap();
        assert!(vm.contains("push constant 3\ncall Output.printInt 1"));
        assert!(!vm.contains("push pointer 0"));
    }

    #[test]
    fn test_array_let_guards_that_pointer() {
        let vm = compile(
            "class Main {\n\
             function void f(Array x, Array y, int i) {\n\
                 let x[i] = y[i];\n\
                 return;\n\
             }\n\
             }",
        )
        .unwrap();
        let body: Vec<&str> = vm.lines().skip(1).collect();
        assert_eq!(
            body,
            vec![
                "push argument 0",
                "push argument 2",
                "add",
                "push argument 1",
                "push argument 2",
                "add",
                "pop pointer 1",
                "push that 0",
                "pop temp 0",
                "pop pointer 1",
                "push temp 0",
                "pop that 0",
                "return",
            ]
        );
    }

    #[test]
    fn test_void_return_pushes_zero() {
        let vm = compile("class Main { function void f() { return; } }").unwrap();
        assert!(vm.contains("push constant 0\nreturn"));
    }

    #[test]
    fn test_static_and_field_segments() {
        let vm = compile(
            "class Counter {\n\
             static int total;\n\
             field int mine;\n\
             method void bump() {\n\
                 let total = total + 1;\n\
                 let mine = mine + 1;\n\
                 return;\n\
             }\n\
             }",
        )
        .unwrap();
        assert!(vm.contains("push static 0"));
        assert!(vm.contains("pop static 0"));
        assert!(vm.contains("push this 0"));
        assert!(vm.contains("pop this 0"));
    }

    #[test]
    fn test_syntax_error_carries_line() {
        let err = compile("class Main {\n  function void f() {\n    let = 3;\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("expected an identifier"));
    }

    #[test]
    fn test_trailing_tokens_after_class_rejected() {
        let err = compile("class A { } class B { }").unwrap_err();
        assert!(err.message.contains("after class body"));
    }

    #[test]
    fn test_duplicate_declaration_rejected() {
        let err = compile(
            "class Main {\n\
             function void f() {\n\
                 var int x;\n\
                 var boolean x;\n\
                 return;\n\
             }\n\
             }",
        )
        .unwrap_err();
        assert!(err.message.contains("already defined"));
        assert_eq!(err.line, 4);
    }

    #[test]
    fn test_locals_counted_before_statements() {
        let vm = compile(
            "class Main {\n\
             function void f() {\n\
                 var int a, b;\n\
                 var boolean c;\n\
                 return;\n\
             }\n\
             }",
        )
        .unwrap();
        assert!(vm.starts_with("function Main.f 3\n"));
    }
}
