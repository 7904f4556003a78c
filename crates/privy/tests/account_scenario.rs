//! End-to-end account scenario: private balances, public methods and a
//! public static counter

use privy::{ClassBuilder, ClassRef, ClassRegistry, ScopeError, Target, Value};

fn account_class() -> ClassRef {
    ClassBuilder::new("Account")
        .namespace(|ns| {
            ns.public().statics().set("num_accounts", 0)?;
            ns.private().set("balance", 0)?;

            ns.constructor("Account", |this, args| {
                this.private().set("balance", args.int(0)?)?;
                let count = this.public().statics().get("num_accounts")?.expect_int()?;
                this.public().statics().set("num_accounts", count + 1)?;
                Ok(Value::Null)
            })?;

            ns.method(Target::Public, "deposit", |this, args| {
                let balance = this.private().get("balance")?.expect_int()?;
                this.private().set("balance", balance + args.int(0)?)?;
                Ok(Value::Null)
            })?;
            ns.method(Target::Public, "get_balance", |this, _| {
                this.private().get("balance")
            })
        })
        .build()
        .unwrap()
}

#[test]
fn test_three_accounts() {
    let account = account_class();
    let deposits = [10, 20, 30];

    let accounts: Vec<_> = deposits
        .iter()
        .map(|amount| {
            let a = account.construct(&[Value::from(0)]).unwrap();
            a.call("deposit", &[Value::from(*amount)]).unwrap();
            a
        })
        .collect();

    for (a, amount) in accounts.iter().zip(deposits) {
        assert_eq!(a.call("get_balance", &[]).unwrap(), Value::from(amount));
        assert!(matches!(
            a.get("num_accounts"),
            Err(ScopeError::Access { .. })
        ));
        assert!(matches!(a.get("balance"), Err(ScopeError::Access { .. })));
    }
    assert_eq!(account.get("num_accounts").unwrap(), Value::from(3));
}

#[test]
fn test_setter_on_one_instance_leaves_others() {
    let account = account_class();
    let a = account.construct(&[Value::from(5)]).unwrap();
    let b = account.construct(&[Value::from(5)]).unwrap();

    a.call("deposit", &[Value::from(1)]).unwrap();
    a.call("deposit", &[Value::from(2)]).unwrap();

    assert_eq!(a.call("get_balance", &[]).unwrap(), Value::from(8));
    assert_eq!(b.call("get_balance", &[]).unwrap(), Value::from(5));
}

#[test]
fn test_bad_deposit_argument() {
    let account = account_class();
    let a = account.construct(&[Value::from(0)]).unwrap();

    assert!(matches!(
        a.call("deposit", &[Value::from("ten")]),
        Err(ScopeError::Argument { .. })
    ));
    assert_eq!(a.call("get_balance", &[]).unwrap(), Value::from(0));
}

#[test]
fn test_registered_account_class() {
    let registry = ClassRegistry::new();
    let account = account_class();
    registry.register(&account).unwrap();

    let found = registry.get("Account").unwrap();
    let a = found.construct(&[Value::from(1)]).unwrap();
    assert_eq!(a.call("get_balance", &[]).unwrap(), Value::from(1));
    assert_eq!(account.get("num_accounts").unwrap(), Value::from(1));
}
