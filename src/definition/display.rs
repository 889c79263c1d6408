use super::{
    AmbiguityCheck, AmbiguityKind, InputCheck, NodeTarget, ParserDefinition, Statement,
};
use std::fmt::{Display, Formatter, Write};

impl InputCheck {
    /// A mangled, human-readable name for the check.
    pub fn name(&self) -> String {
        match self {
            InputCheck::Literal(text) if text.is_empty() => "test_empty".into(),
            InputCheck::Literal(text) => format!("test_literal__{}", text),
            InputCheck::Range(set) => format!("test_range__{}", set),
        }
    }
}

impl AmbiguityCheck {
    pub fn name(&self) -> String {
        let base = match (self.kind, self.negated) {
            (AmbiguityKind::Precede, false) => "check_precede",
            (AmbiguityKind::Precede, true) => "check_not_precede",
            (AmbiguityKind::Follow, false) => "check_follow",
            (AmbiguityKind::Follow, true) => "check_not_follow",
            (AmbiguityKind::Restriction, _) => "check_restriction",
        };
        let literals = self.literals.join("__");
        if self.ranges.is_empty() {
            format!("{}__{}", base, literals)
        } else if literals.is_empty() {
            format!("{}__{}", base, self.ranges)
        } else {
            format!("{}__{}__{}", base, literals, self.ranges)
        }
    }
}

impl Display for ParserDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "parser {}", self.metadata.name)?;
        writeln!(
            f,
            "start: {}; end: {}",
            self.slot(self.start_slot).name,
            self.slot(self.end_slot).name
        )?;
        for check in &self.ambiguity_checks {
            writeln!(
                f,
                "ambiguity {} at {} ({})",
                check.name(),
                self.slot(check.slot).name,
                if check.in_pop { "in-pop" } else { "inline" }
            )?;
        }
        for (index, function) in self.functions.iter().enumerate() {
            let slots: Vec<&str> = self
                .goto_table
                .iter()
                .enumerate()
                .filter(|(_, target)| {
                    target.map_or(false, |function_id| function_id.0 == index)
                })
                .map(|(slot_index, _)| self.slots[slot_index].name.as_str())
                .collect();
            writeln!(f, "fn {} <- [{}]", function.name, slots.join(", "))?;
            let mut rendered = String::new();
            self.write_statements(&mut rendered, &function.body, 1)?;
            write!(f, "{}", rendered)?;
        }
        Ok(())
    }
}

impl ParserDefinition {
    fn write_statements(
        &self,
        writer: &mut dyn Write,
        statements: &[Statement],
        depth: usize,
    ) -> std::fmt::Result {
        let indent = "  ".repeat(depth);
        for statement in statements {
            match statement {
                Statement::Conditional { checks, body } => {
                    let names: Vec<String> = checks
                        .iter()
                        .map(|check| self.input_check(*check).name())
                        .collect();
                    writeln!(writer, "{}if any [{}]:", indent, names.join(", "))?;
                    self.write_statements(writer, body, depth + 1)?;
                }
                Statement::Disambiguate { check } => {
                    writeln!(
                        writer,
                        "{}disambiguate {}",
                        indent,
                        self.ambiguity_check(*check).name()
                    )?;
                }
                Statement::NodeT { target, check } => {
                    let register = match target {
                        NodeTarget::Current => "c_n",
                        NodeTarget::Right => "c_r",
                    };
                    writeln!(
                        writer,
                        "{}{} = node_t {}",
                        indent,
                        register,
                        self.input_check(*check).name()
                    )?;
                }
                Statement::NodeP { slot } => {
                    writeln!(writer, "{}c_n = node_p {}", indent, self.slot(*slot).name)?;
                }
                Statement::Create { slot } => {
                    writeln!(writer, "{}c_u = create {}", indent, self.slot(*slot).name)?;
                }
                Statement::Add { slot } => {
                    writeln!(writer, "{}add {}", indent, self.slot(*slot).name)?;
                }
                Statement::Call { function } => {
                    writeln!(writer, "{}call {}", indent, self.function(*function).name)?;
                }
                Statement::Pop => writeln!(writer, "{}pop", indent)?,
            }
        }
        Ok(())
    }
}
