use std::rc::Rc;

use crate::flow::node::{Behavior, Emit, Transform};
use crate::foundation::core::Datum;
use crate::foundation::error::GentrackResult;

/// Defensive copy: emits a fresh shallow copy of every record.
///
/// Inserted by the flow builder in front of every transform that writes into
/// its input, so the write cannot be observed on a sibling branch.
#[derive(Clone, Copy, Debug, Default)]
pub struct CloneTransform;

impl Transform for CloneTransform {
    fn kind(&self) -> &'static str {
        "clone"
    }

    fn behavior(&self) -> Behavior {
        Behavior::Clones
    }

    fn handle(&mut self, datum: Datum, out: &mut Emit) -> GentrackResult<()> {
        out.push(Rc::new((*datum).clone()));
        Ok(())
    }
}
