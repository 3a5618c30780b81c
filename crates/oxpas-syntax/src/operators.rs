// operators.rs
//
// Operator kinds and the names under which their overloads are declared.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,    // /
    IntDivide, // div
    Modulus,   // mod
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanEqual,
    GreaterThanEqual,
    In,
    Is,
    As,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::LessThan
                | BinaryOp::GreaterThan
                | BinaryOp::LessThanEqual
                | BinaryOp::GreaterThanEqual
        )
    }

    pub fn is_shift(self) -> bool {
        matches!(self, BinaryOp::Shl | BinaryOp::Shr)
    }

    /// Names a struct may declare `class operator` overloads under.
    ///
    /// `and`/`or`/`xor` map to both the logical and bitwise operator names.
    pub fn overload_names(self) -> &'static [&'static str] {
        match self {
            BinaryOp::Add => &["Add"],
            BinaryOp::Subtract => &["Subtract"],
            BinaryOp::Multiply => &["Multiply"],
            BinaryOp::Divide => &["Divide"],
            BinaryOp::IntDivide => &["IntDivide"],
            BinaryOp::Modulus => &["Modulus"],
            BinaryOp::And => &["LogicalAnd", "BitwiseAnd"],
            BinaryOp::Or => &["LogicalOr", "BitwiseOr"],
            BinaryOp::Xor => &["LogicalXor", "BitwiseXor"],
            BinaryOp::Shl => &["LeftShift"],
            BinaryOp::Shr => &["RightShift"],
            BinaryOp::Equal => &["Equal"],
            BinaryOp::NotEqual => &["NotEqual"],
            BinaryOp::LessThan => &["LessThan"],
            BinaryOp::GreaterThan => &["GreaterThan"],
            BinaryOp::LessThanEqual => &["LessThanOrEqual"],
            BinaryOp::GreaterThanEqual => &["GreaterThanOrEqual"],
            BinaryOp::In => &["In"],
            BinaryOp::Is | BinaryOp::As => &[],
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::IntDivide => "div",
            BinaryOp::Modulus => "mod",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
            BinaryOp::Shl => "shl",
            BinaryOp::Shr => "shr",
            BinaryOp::Equal => "=",
            BinaryOp::NotEqual => "<>",
            BinaryOp::LessThan => "<",
            BinaryOp::GreaterThan => ">",
            BinaryOp::LessThanEqual => "<=",
            BinaryOp::GreaterThanEqual => ">=",
            BinaryOp::In => "in",
            BinaryOp::Is => "is",
            BinaryOp::As => "as",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Negate,
    Plus,
    Not,
    AddressOf, // @
}

impl UnaryOp {
    pub fn overload_names(self) -> &'static [&'static str] {
        match self {
            UnaryOp::Negate => &["Negative"],
            UnaryOp::Plus => &["Positive"],
            UnaryOp::Not => &["LogicalNot", "BitwiseNot"],
            UnaryOp::AddressOf => &[],
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "not",
            UnaryOp::AddressOf => "@",
        }
    }
}
