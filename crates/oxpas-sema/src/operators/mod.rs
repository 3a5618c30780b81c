// operators/mod.rs
//
// Operator-applicability synthesis: the builtin signatures an operator
// offers for given operand types, plus user-declared `class operator`
// overloads. The result is ranked by the invocation resolver like any other
// overload set.

mod ladder;

use oxpas_identity::DeclId;
use oxpas_syntax::{BinaryOp, UnaryOp};
use smallvec::smallvec;

use crate::symbols::SymbolTable;
use crate::type_arena::{SemaType, TypeArena, TypeId, TypeIdVec};

use ladder::{LadderKind, NEGATE_LADDER, POSITIVE_LADDER, SHIFT_LADDER, binary_ladder};

/// A builtin operator signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorIntrinsic {
    pub name: &'static str,
    pub params: TypeIdVec,
    pub ret: TypeId,
}

impl OperatorIntrinsic {
    fn binary(name: &'static str, left: TypeId, right: TypeId, ret: TypeId) -> Self {
        Self {
            name,
            params: smallvec![left, right],
            ret,
        }
    }

    fn unary(name: &'static str, operand: TypeId, ret: TypeId) -> Self {
        Self {
            name,
            params: smallvec![operand],
            ret,
        }
    }
}

/// Everything an operator expression may invoke.
#[derive(Debug, Clone, Default)]
pub struct OperatorSet {
    /// Builtin signatures in synthesis order, without duplicates.
    pub intrinsics: Vec<OperatorIntrinsic>,
    /// `class operator` declarations of struct operands.
    pub overloads: Vec<DeclId>,
}

impl OperatorSet {
    pub fn is_empty(&self) -> bool {
        self.intrinsics.is_empty() && self.overloads.is_empty()
    }

    fn add(&mut self, intrinsic: OperatorIntrinsic) {
        if !self.intrinsics.contains(&intrinsic) {
            self.intrinsics.push(intrinsic);
        }
    }

    fn add_overloads(&mut self, decls: Vec<DeclId>) {
        for decl in decls {
            if !self.overloads.contains(&decl) {
                self.overloads.push(decl);
            }
        }
    }

    /// True if some intrinsic has exactly these parameter and result types.
    pub fn contains_signature(&self, params: &[TypeId], ret: TypeId) -> bool {
        self.intrinsics
            .iter()
            .any(|i| i.params.as_slice() == params && i.ret == ret)
    }
}

pub struct OperatorSynthesizer<'a> {
    arena: &'a mut TypeArena,
    symbols: &'a SymbolTable,
}

impl<'a> OperatorSynthesizer<'a> {
    pub fn new(arena: &'a mut TypeArena, symbols: &'a SymbolTable) -> Self {
        Self { arena, symbols }
    }

    /// Normalize an operand: procedural values are replaced by their result
    /// and array constructors by a single-element constructor of their
    /// widest member (void when empty).
    pub fn operand_type(&mut self, ty: TypeId) -> TypeId {
        let ty = self.arena.skip_weak_alias(ty);
        if let Some(ret) = self.arena.return_type(ty)
            && !ret.is_void()
        {
            return self.operand_type(ret);
        }
        if let SemaType::ArrayConstructor(elements) = self.arena.get(ty) {
            let widest = self.arena.widest_type(elements);
            return self.arena.array_constructor(smallvec![widest]);
        }
        ty
    }

    #[tracing::instrument(level = "trace", skip(self))]
    pub fn binary(&mut self, op: BinaryOp, left: TypeId, right: TypeId) -> OperatorSet {
        let left = self.operand_type(left);
        let right = self.operand_type(right);
        let operands = [left, right];
        let mut set = OperatorSet::default();

        for &operand in &operands {
            if self.arena.is_struct(operand) {
                let decls = self
                    .symbols
                    .operator_overloads(&*self.arena, operand, op.overload_names());
                set.add_overloads(decls);
            }
        }

        if op.is_comparison() {
            let name = op.overload_names()[0];
            set.add(OperatorIntrinsic::binary(
                name,
                TypeId::UNTYPED,
                TypeId::UNTYPED,
                TypeId::BOOLEAN,
            ));
            if operands.iter().any(|&t| self.arena.is_variant(t)) {
                set.add(OperatorIntrinsic::binary(
                    name,
                    TypeId::VARIANT,
                    TypeId::VARIANT,
                    TypeId::BOOLEAN,
                ));
            }
            return set;
        }

        match op {
            BinaryOp::In => {
                set.add(OperatorIntrinsic::binary(
                    "In",
                    TypeId::ANY_ORDINAL,
                    TypeId::ANY_SET,
                    TypeId::BOOLEAN,
                ));
            }
            BinaryOp::Is | BinaryOp::As => {}
            BinaryOp::Shl | BinaryOp::Shr => self.shift(op, &operands, &mut set),
            _ => {
                for &operand in &operands {
                    self.binary_for_operand(op, operand, &operands, &mut set);
                }
            }
        }
        set
    }

    fn binary_for_operand(
        &mut self,
        op: BinaryOp,
        operand: TypeId,
        operands: &[TypeId; 2],
        set: &mut OperatorSet,
    ) {
        let arena = &*self.arena;
        let name = op.overload_names().first().copied().unwrap_or("");
        let is_arithmetic = matches!(
            op,
            BinaryOp::Add
                | BinaryOp::Subtract
                | BinaryOp::Multiply
                | BinaryOp::IntDivide
                | BinaryOp::Modulus
        );
        let is_bitwise = matches!(op, BinaryOp::And | BinaryOp::Or | BinaryOp::Xor);

        if arena.is_integer(operand) {
            if is_arithmetic || is_bitwise {
                let (name, kind) = if is_bitwise {
                    (op.overload_names()[1], LadderKind::Bitwise)
                } else {
                    (name, LadderKind::Arithmetic)
                };
                self.integer_binary(name, kind, operands, set);
            } else if op == BinaryOp::Divide {
                set.add(real_division());
            }
        } else if arena.is_real(operand) {
            if op == BinaryOp::Divide {
                set.add(real_division());
            } else if matches!(op, BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Multiply) {
                for (left, right) in [
                    (TypeId::EXTENDED, TypeId::EXTENDED),
                    (TypeId::INTEGER, TypeId::EXTENDED),
                    (TypeId::EXTENDED, TypeId::INTEGER),
                ] {
                    set.add(OperatorIntrinsic::binary(name, left, right, TypeId::EXTENDED));
                }
            }
        } else if arena.is_boolean(operand) {
            if is_bitwise {
                set.add(OperatorIntrinsic::binary(
                    name,
                    TypeId::BOOLEAN,
                    TypeId::BOOLEAN,
                    TypeId::BOOLEAN,
                ));
            }
        } else if arena.is_string(operand) || arena.is_char(operand) {
            if op == BinaryOp::Add {
                set.add(OperatorIntrinsic::binary(
                    name,
                    TypeId::STRING,
                    TypeId::STRING,
                    TypeId::STRING,
                ));
            }
        } else if arena.is_variant(operand) {
            set.add(OperatorIntrinsic::binary(
                name,
                TypeId::VARIANT,
                TypeId::VARIANT,
                TypeId::VARIANT,
            ));
        } else if arena.is_pointer(operand) {
            if arena.allows_pointer_math(operand) {
                pointer_arithmetic(op, operand, set);
            }
        } else if arena.is_set(operand) || arena.is_array_constructor(operand) {
            if matches!(op, BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Multiply) {
                set.add(OperatorIntrinsic::binary(name, operand, operand, operand));
            }
        } else if arena.is_dynamic_array(operand) && op == BinaryOp::Add {
            set.add(OperatorIntrinsic::binary(name, operand, operand, operand));
        }
    }

    /// The integer ladder, or the single native-width signature when both
    /// operands are the distinct NativeInt/NativeUInt type.
    fn integer_binary(
        &self,
        name: &'static str,
        kind: LadderKind,
        operands: &[TypeId; 2],
        set: &mut OperatorSet,
    ) {
        if let Some(native) = self.native_operand(operands) {
            set.add(OperatorIntrinsic::binary(name, native, native, native));
            return;
        }
        for (left, right, ret) in binary_ladder(kind) {
            set.add(OperatorIntrinsic::binary(name, left, right, ret));
        }
    }

    fn native_operand(&self, operands: &[TypeId]) -> Option<TypeId> {
        if self.arena.native_int_is_weak_alias() {
            return None;
        }
        [TypeId::NATIVEINT, TypeId::NATIVEUINT]
            .into_iter()
            .find(|&native| {
                operands
                    .iter()
                    .all(|&t| self.arena.skip_alias(t) == native)
            })
    }

    fn shift(&self, op: BinaryOp, operands: &[TypeId; 2], set: &mut OperatorSet) {
        if !operands.iter().any(|&t| self.arena.is_integer(t)) {
            return;
        }
        let name = op.overload_names()[0];
        let left = self.arena.skip_alias(operands[0]);
        if !self.arena.native_int_is_weak_alias()
            && matches!(left, TypeId::NATIVEINT | TypeId::NATIVEUINT)
        {
            set.add(OperatorIntrinsic::binary(name, left, TypeId::INTEGER, left));
            return;
        }
        for ty in SHIFT_LADDER {
            set.add(OperatorIntrinsic::binary(name, ty, TypeId::INTEGER, ty));
        }
    }

    #[tracing::instrument(level = "trace", skip(self))]
    pub fn unary(&mut self, op: UnaryOp, operand: TypeId) -> OperatorSet {
        let operand = self.operand_type(operand);
        let mut set = OperatorSet::default();
        let arena = &*self.arena;

        if arena.is_struct(operand) {
            let decls = self
                .symbols
                .operator_overloads(arena, operand, op.overload_names());
            set.add_overloads(decls);
        }

        match op {
            UnaryOp::Negate | UnaryOp::Plus => {
                let name = op.overload_names()[0];
                if arena.is_integer(operand) {
                    if arena.size_of(operand) > 4 {
                        let ty = arena.skip_alias(operand);
                        set.add(OperatorIntrinsic::unary(name, ty, ty));
                    } else {
                        let ladder = if op == UnaryOp::Negate {
                            NEGATE_LADDER
                        } else {
                            POSITIVE_LADDER
                        };
                        for (param, ret) in ladder {
                            set.add(OperatorIntrinsic::unary(name, param, ret));
                        }
                    }
                } else if arena.is_real(operand) {
                    set.add(OperatorIntrinsic::unary(name, TypeId::EXTENDED, TypeId::EXTENDED));
                } else if arena.is_variant(operand) {
                    set.add(OperatorIntrinsic::unary(name, TypeId::VARIANT, TypeId::VARIANT));
                }
            }
            UnaryOp::Not => {
                if arena.is_integer(operand) {
                    let ty = arena.skip_alias(operand);
                    set.add(OperatorIntrinsic::unary("BitwiseNot", ty, ty));
                } else if arena.is_boolean(operand) {
                    set.add(OperatorIntrinsic::unary(
                        "LogicalNot",
                        TypeId::BOOLEAN,
                        TypeId::BOOLEAN,
                    ));
                } else if arena.is_variant(operand) {
                    set.add(OperatorIntrinsic::unary(
                        "LogicalNot",
                        TypeId::VARIANT,
                        TypeId::VARIANT,
                    ));
                }
            }
            UnaryOp::AddressOf => {}
        }
        set
    }
}

fn real_division() -> OperatorIntrinsic {
    OperatorIntrinsic::binary("Divide", TypeId::EXTENDED, TypeId::EXTENDED, TypeId::EXTENDED)
}

fn pointer_arithmetic(op: BinaryOp, pointer: TypeId, set: &mut OperatorSet) {
    match op {
        BinaryOp::Add => {
            set.add(OperatorIntrinsic::binary("Add", pointer, TypeId::INTEGER, pointer));
            set.add(OperatorIntrinsic::binary("Add", TypeId::INTEGER, pointer, pointer));
            set.add(OperatorIntrinsic::binary(
                "Add",
                pointer,
                TypeId::POINTER_MATH_OPERAND,
                pointer,
            ));
        }
        BinaryOp::Subtract => {
            set.add(OperatorIntrinsic::binary("Subtract", pointer, TypeId::INTEGER, pointer));
            set.add(OperatorIntrinsic::binary(
                "Subtract",
                pointer,
                TypeId::POINTER_MATH_OPERAND,
                TypeId::INTEGER,
            ));
        }
        _ => {}
    }
}
