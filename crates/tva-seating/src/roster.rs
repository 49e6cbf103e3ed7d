use crate::{ContractContext, Passenger, PassengerRole};

/// Id of the contract holder.
pub const TITULAR_ID: &str = "titular";

/// Id of the `index`-th companion (`companion_0`, `companion_1`, …).
pub fn companion_id(index: usize) -> String {
    format!("companion_{index}")
}

/// Build the ordered passenger list: titular first, then companions in the
/// order they were drafted. Ids are positional and stable for the session.
pub fn build_roster(ctx: &ContractContext) -> Vec<Passenger> {
    let mut roster = Vec::with_capacity(1 + ctx.companions.len());
    roster.push(Passenger::new(
        TITULAR_ID,
        ctx.titular.name.clone(),
        ctx.titular.age,
        PassengerRole::Titular,
    ));
    for (i, c) in ctx.companions.iter().enumerate() {
        roster.push(Passenger::new(
            companion_id(i),
            c.name.clone(),
            c.age,
            PassengerRole::Companion,
        ));
    }
    roster
}
