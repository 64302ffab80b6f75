//! Shared syntax tree consumed by both backends.
//!
//! The parser builds these nodes once; the interpreter walks them directly
//! and the code generator renders them as C++ text. Every node owns its
//! children and nothing mutates the tree after parsing.

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Number(f64),
    String(String),
    Identifier(String),
    Assign {
        name: String,
        value: Box<Expression>,
    },
    Binary {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
    Call {
        callee: Box<Expression>,
        args: Vec<Expression>,
    },
    Member {
        object: Box<Expression>,
        member: String,
    },
    New {
        class_name: String,
        args: Vec<Expression>,
    },
}

impl Expression {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Number(_) => "number literal",
            Expression::String(_) => "string literal",
            Expression::Identifier(_) => "identifier",
            Expression::Assign { .. } => "assignment",
            Expression::Binary { .. } => "binary expression",
            Expression::Unary { .. } => "unary expression",
            Expression::Call { .. } => "call",
            Expression::Member { .. } => "member access",
            Expression::New { .. } => "new expression",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOperator {
    Negate,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Negate => "-",
        }
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
}

/// A class declaration. The body is an ordinary block; only `let` fields and
/// function methods are meaningful inside it, which the code generator checks.
#[derive(Debug, PartialEq, Clone)]
pub struct ClassDecl {
    pub name: String,
    pub base: Option<String>,
    pub body: Block,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Let {
        name: String,
        value: Expression,
    },
    Print(Expression),
    Expr(Expression),
    Return(Option<Expression>),
    Block(Block),
    If {
        condition: Expression,
        then_branch: Block,
        else_branch: Option<Block>,
    },
    While {
        condition: Expression,
        body: Block,
    },
    Function(FunctionDecl),
    Class(ClassDecl),
}

impl Statement {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::Let { .. } => "variable declaration",
            Statement::Print(_) => "print statement",
            Statement::Expr(_) => "expression statement",
            Statement::Return(_) => "return statement",
            Statement::Block(_) => "block",
            Statement::If { .. } => "if statement",
            Statement::While { .. } => "while statement",
            Statement::Function(_) => "function declaration",
            Statement::Class(_) => "class declaration",
        }
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}
