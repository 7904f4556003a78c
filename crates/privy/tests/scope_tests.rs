//! Integration tests for member scoping
//!
//! Tests cover:
//! - Reserved names rejected in every container
//! - Static members unreachable through instances
//! - Per-instance private state
//! - Constructor name checking
//! - Static scope isolation
//! - Special hooks

use privy::{ClassBuilder, ClassRef, ScopeError, Special, Target, Value, Visibility, RESERVED_NAMES};

/// Player class exercising every namespace and hook
fn player_class() -> ClassRef {
    ClassBuilder::new("Player")
        .namespace(|ns| {
            ns.public().statics().set("pubstat", 420)?;
            ns.private().statics().set("privstat", 19)?;

            ns.constructor("Player", |this, args| {
                args.expect(2)?;
                this.public().set("publicvar", 1)?;
                this.private().set("name", args.str(0)?)?;
                this.private().set("level", args.int(1)?)?;
                Ok(Value::Null)
            })?;

            ns.method(Target::Public, "get_name", |this, _| this.private().get("name"))?;
            ns.method(Target::Public, "get_level", |this, _| this.private().get("level"))?;
            ns.method(Target::Public, "set_name", |this, args| {
                this.private().set("name", args.str(0)?)?;
                Ok(Value::Null)
            })?;
            ns.method(Target::Public, "set_level", |this, args| {
                this.private().set("level", args.int(0)?)?;
                Ok(Value::Null)
            })?;
            ns.method(Target::Private, "top_secret", |this, _| {
                let name = this.private().get("name")?;
                let level = this.private().get("level")?.expect_int()?;
                Ok(Value::from(name.expect_str()?.repeat(level as usize * 2)))
            })?;

            ns.method(Target::PublicStatic, "get_private_static_variable", |this, _| {
                this.private().statics().get("privstat")
            })?;
            ns.method(Target::PublicStatic, "get_max_level", |this, _| {
                if this.private().has("name") || this.public().has("publicvar") {
                    return Err(ScopeError::runtime("instance members visible from static scope"));
                }
                Ok(Value::from(12))
            })?;
            ns.method(Target::PrivateStatic, "get_secret_key", |_, _| Ok(Value::from(420)))?;

            ns.special(Special::Call, |this, _| this.private().call("top_secret", &[]))?;
            ns.special(Special::Str, |this, _| {
                let name = this.private().get("name")?;
                let level = this.private().get("level")?;
                Ok(Value::from(format!("{} is at level {}", name, level)))
            })?;
            Ok(())
        })
        .build()
        .unwrap()
}

fn steven(class: &ClassRef) -> privy::ObjectRef {
    class
        .construct(&[Value::from("steven"), Value::from(10)])
        .unwrap()
}

#[test]
fn test_reserved_names_rejected_in_every_container() {
    for name in RESERVED_NAMES {
        for target in [
            Target::Public,
            Target::Private,
            Target::PublicStatic,
            Target::PrivateStatic,
        ] {
            let result = ClassBuilder::new("Holder")
                .namespace(move |ns| {
                    let proxy = ns.scope().proxy(target.visibility());
                    let proxy = if target.is_static() { proxy.statics() } else { proxy };
                    proxy.set(name, 1)
                })
                .build();
            assert!(
                matches!(result, Err(ScopeError::Declaration { .. })),
                "{} in {:?}",
                name,
                target
            );
        }
    }
}

#[test]
fn test_reserved_method_names_rejected() {
    let result = ClassBuilder::new("Holder")
        .namespace(|ns| ns.method(Target::Public, "special", |_, _| Ok(Value::Null)))
        .build();
    assert!(matches!(result, Err(ScopeError::Declaration { .. })));
}

#[test]
fn test_failed_declaration_binds_nothing() {
    let class = ClassBuilder::new("Holder")
        .namespace(|ns| {
            if ns.public().set("static", 1).is_ok() {
                return Err(ScopeError::runtime("reserved name accepted"));
            }
            Ok(())
        })
        .build()
        .unwrap();

    assert!(class.instance_members(Visibility::Public).is_empty());
    assert!(class.static_members(Visibility::Public).is_empty());
}

#[test]
fn test_public_access() {
    let class = player_class();
    let obj = steven(&class);

    assert_eq!(obj.get("publicvar").unwrap(), Value::from(1));
    assert_eq!(obj.call("get_name", &[]).unwrap(), Value::from("steven"));
    assert_eq!(obj.call("get_level", &[]).unwrap(), Value::from(10));

    obj.call("set_name", &[Value::from("Steven")]).unwrap();
    obj.call("set_level", &[Value::from(11)]).unwrap();
    assert_eq!(obj.call("get_name", &[]).unwrap(), Value::from("Steven"));
    assert_eq!(obj.call("get_level", &[]).unwrap(), Value::from(11));
}

#[test]
fn test_private_encapsulation() {
    let class = player_class();
    let obj = steven(&class);

    assert!(!obj.has("private"));
    assert!(matches!(obj.get("name"), Err(ScopeError::Access { .. })));
    assert!(matches!(obj.call("top_secret", &[]), Err(ScopeError::Access { .. })));
}

#[test]
fn test_public_member_shares_name_with_private() {
    let class = ClassBuilder::new("Badge")
        .namespace(|ns| {
            ns.public().set("label", "visible")?;
            ns.private().set("label", "hidden")?;
            ns.method(Target::Public, "inner_label", |this, _| this.private().get("label"))?;
            ns.method(Target::Public, "shout", |_, _| Ok(Value::from("public")))?;
            ns.method(Target::Private, "shout", |_, _| Ok(Value::from("private")))
        })
        .build()
        .unwrap();
    let badge = class.construct(&[]).unwrap();

    assert_eq!(badge.get("label").unwrap(), Value::from("visible"));
    assert_eq!(badge.call("shout", &[]).unwrap(), Value::from("public"));
    badge.set("label", "renamed").unwrap();
    assert_eq!(badge.get("label").unwrap(), Value::from("renamed"));
    assert_eq!(badge.call("inner_label", &[]).unwrap(), Value::from("hidden"));
}

#[test]
fn test_static_members_unreachable_through_instance() {
    let class = player_class();
    let obj = steven(&class);

    assert!(matches!(obj.get("pubstat"), Err(ScopeError::Access { .. })));
    assert!(matches!(obj.set("pubstat", 1), Err(ScopeError::Access { .. })));
    assert!(matches!(obj.get("privstat"), Err(ScopeError::Access { .. })));
    assert!(matches!(
        obj.call("get_max_level", &[]),
        Err(ScopeError::Access { .. })
    ));
    assert_eq!(class.get("pubstat").unwrap(), Value::from(420));
}

#[test]
fn test_static_methods() {
    let class = player_class();
    let _obj = steven(&class);

    assert_eq!(class.call("get_max_level", &[]).unwrap(), Value::from(12));
    assert_eq!(
        class.call("get_private_static_variable", &[]).unwrap(),
        Value::from(19)
    );
    assert!(!class.has("get_secret_key"));
    assert!(matches!(
        class.call("get_secret_key", &[]),
        Err(ScopeError::Access { .. })
    ));
}

#[test]
fn test_static_writes_survive_construction() {
    let class = player_class();
    class.set("pubstat", 1000).unwrap();
    assert_eq!(class.get("pubstat").unwrap(), Value::from(1000));

    let _other = class
        .construct(&[Value::from("Esteban"), Value::from(9)])
        .unwrap();
    assert_eq!(class.get("pubstat").unwrap(), Value::from(1000));
}

#[test]
fn test_instances_do_not_share_private_state() {
    let class = player_class();
    let a = steven(&class);
    let b = steven(&class);

    a.call("set_name", &[Value::from("alice")]).unwrap();
    a.call("set_name", &[Value::from("alicia")]).unwrap();

    assert_eq!(a.call("get_name", &[]).unwrap(), Value::from("alicia"));
    assert_eq!(b.call("get_name", &[]).unwrap(), Value::from("steven"));
}

#[test]
fn test_special_hooks() {
    let class = player_class();
    let obj = steven(&class);
    obj.call("set_name", &[Value::from("Steven")]).unwrap();
    obj.call("set_level", &[Value::from(11)]).unwrap();

    assert_eq!(obj.invoke(&[]).unwrap(), Value::from("Steven".repeat(22)));
    assert_eq!(obj.render().unwrap(), "Steven is at level 11");
    assert_eq!(obj.to_string(), "Steven is at level 11");
    assert_eq!(obj.repr().unwrap(), "Steven is at level 11");
    assert!(obj.get("__str__").unwrap().is_method());
    assert_eq!(
        obj.call("__call__", &[]).unwrap(),
        Value::from("Steven".repeat(22))
    );
}

#[test]
fn test_eq_hook() {
    let class = ClassBuilder::new("Tag")
        .namespace(|ns| {
            ns.constructor("Tag", |this, args| {
                this.public().set("label", args.str(0)?)?;
                Ok(Value::Null)
            })?;
            ns.special(Special::Eq, |this, args| {
                let other = args.object(0)?;
                Ok(Value::from(this.public().get("label")? == other.get("label")?))
            })
        })
        .build()
        .unwrap();

    let a = class.construct(&[Value::from("x")]).unwrap();
    let b = class.construct(&[Value::from("x")]).unwrap();
    let c = class.construct(&[Value::from("y")]).unwrap();

    assert!(a.equals(&b).unwrap());
    assert!(!a.equals(&c).unwrap());
}

#[test]
fn test_constructor_name_mismatch_is_deterministic() {
    let class = ClassBuilder::new("Widget")
        .namespace(|ns| {
            ns.constructor("Gadget", |_, _| Err(ScopeError::runtime("constructor body ran")))
        })
        .build()
        .unwrap();

    for _ in 0..5 {
        assert_eq!(
            class.construct(&[]).unwrap_err(),
            ScopeError::Naming {
                class: "Widget".to_string(),
                found: "Gadget".to_string(),
            }
        );
    }
}

#[test]
fn test_last_constructor_wins() {
    let class = ClassBuilder::new("Widget")
        .namespace(|ns| {
            ns.constructor("Gadget", |_, _| Ok(Value::Null))?;
            ns.constructor("Widget", |this, _| {
                this.public().set("built", true)?;
                Ok(Value::Null)
            })
        })
        .build()
        .unwrap();

    let w = class.construct(&[]).unwrap();
    assert_eq!(w.get("built").unwrap(), Value::from(true));
}

#[test]
fn test_missing_constructor_is_noop() {
    let class = ClassBuilder::new("Plain")
        .namespace(|ns| ns.public().set("color", "red"))
        .build()
        .unwrap();

    let p = class.construct(&[Value::from(1), Value::from(2)]).unwrap();
    assert_eq!(p.get("color").unwrap(), Value::from("red"));
}

#[test]
fn test_failing_constructor_returns_no_object() {
    let class = ClassBuilder::new("Fragile")
        .namespace(|ns| {
            ns.constructor("Fragile", |_, args| {
                if args.is_empty() {
                    return Err(ScopeError::runtime("needs an argument"));
                }
                Ok(Value::Null)
            })
        })
        .build()
        .unwrap();

    assert_eq!(
        class.construct(&[]).unwrap_err(),
        ScopeError::runtime("needs an argument")
    );
    assert!(class.construct(&[Value::Null]).is_ok());
}
