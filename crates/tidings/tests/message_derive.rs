use serde::Deserialize;
use tidings::prelude::*;

#[derive(Debug, Clone, PartialEq, Deserialize, Message)]
pub struct Damage {
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Message)]
#[message(name = "combat.FireDamage")]
pub struct FireDamage {
    #[message(parent)]
    pub base: Damage,
    pub burn_ticks: u8,
}

#[derive(Debug, Clone, PartialEq, Message)]
pub struct Inferno(#[message(parent)] FireDamage, u32);

#[derive(Debug, Clone, PartialEq, Message)]
pub enum Status {
    Stunned,
    Slowed { percent: u8 },
}

#[test]
fn test_root_type_identity() {
    let ty = Damage::static_type();

    assert_eq!(ty.name(), "Damage");
    assert_eq!(ty.parent(), None);
    assert_eq!(Damage { amount: 1 }.payload_type(), ty);
}

#[test]
fn test_name_override_and_parent() {
    let ty = FireDamage::static_type();

    assert_eq!(ty.name(), "combat.FireDamage");
    assert_eq!(ty.parent(), Some(Damage::static_type()));
}

#[test]
fn test_three_level_lineage() {
    let names: Vec<_> = Inferno::static_type()
        .ancestors()
        .map(|ty| ty.name())
        .collect();

    assert_eq!(names, ["Inferno", "combat.FireDamage", "Damage"]);
    assert!(Inferno::static_type().is_child_of(&Damage::static_type()));
    assert!(!Damage::static_type().is_child_of(&Inferno::static_type()));
    assert!(!Status::static_type().is_child_of(&Damage::static_type()));
}

#[test]
fn test_deref_reaches_parent_fields() {
    let mut inferno = Inferno(
        FireDamage {
            base: Damage { amount: 10 },
            burn_ticks: 2,
        },
        99,
    );

    assert_eq!(inferno.burn_ticks, 2);
    assert_eq!(inferno.amount, 10);

    inferno.amount = 12;
    assert_eq!(inferno.0.base.amount, 12);
}

#[test]
fn test_view_as_ancestor() {
    let inferno = Inferno(
        FireDamage {
            base: Damage { amount: 3 },
            burn_ticks: 1,
        },
        7,
    );
    let payload: &dyn Message = &inferno;

    assert_eq!(payload.view::<Damage>(), Some(&Damage { amount: 3 }));
    assert_eq!(payload.view::<FireDamage>().map(|f| f.burn_ticks), Some(1));
    assert_eq!(payload.view::<Inferno>().map(|i| i.1), Some(7));
    assert!(payload.view::<Status>().is_none());
}

#[test]
fn test_enum_payload() {
    let status = Status::Slowed { percent: 30 };
    let payload: &dyn Message = &status;

    assert!(payload.is::<Status>());
    assert_eq!(
        payload.view::<Status>(),
        Some(&Status::Slowed { percent: 30 })
    );
    assert_ne!(Status::Stunned.payload_type(), Damage::static_type());
}
