mod instruction;
mod register;
mod unit;

pub use instruction::{Flow, Instruction, Opcode, Operand, Relop};
pub use register::{PhysReg, Reg, RegClass, RegInfo, RegName, RegisterTable, SymReg};
pub use unit::{LabelId, LabelInfo, LabelTable, Program, Unit, UnitKind, UnitMeta};
