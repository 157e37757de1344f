use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tessera_env::{Env, MemoryHost};
use tessera_storage::{
    layout_at, packed_layout, pull_packed_root, pull_spread_root, push_packed_root,
    push_spread_root, spread_layout, try_pull_spread_root, Key, Lazy, LazyIndexMap, Pack,
    StorageEntry, StorageError, Vector,
};

fn setup() -> Env<MemoryHost> {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
    Env::new(MemoryHost::new())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Order {
    id: u64,
    items: BTreeMap<String, u32>,
    note: Option<String>,
}

packed_layout!(Order { id, items, note });

#[derive(Debug, Default, PartialEq)]
struct Account {
    owner: [u8; 32],
    balance: u128,
    last_order: Order,
}

spread_layout!(Account {
    owner: [u8; 32],
    balance: u128,
    last_order: Order,
});

fn order() -> Order {
    let mut items = BTreeMap::new();
    items.insert(String::from("apple"), 3);
    items.insert(String::from("pear"), 1);
    Order {
        id: 9,
        items,
        note: Some(String::from("fragile")),
    }
}

#[test]
fn test_packed_roundtrip() {
    let mut env = setup();
    let key = Key::from_u64(77);
    let value = (order(), vec![BTreeSet::from([1i16, -1])], [true; 3]);

    push_packed_root(&value, &key, &mut env).unwrap();
    let pulled: (Order, Vec<BTreeSet<i16>>, [bool; 3]) = pull_packed_root(&key, &mut env);

    assert_eq!(pulled, value);
    assert_eq!(env.host().len(), 1);
}

#[test]
fn test_spread_roundtrip() {
    let mut env = setup();
    let root = Key::from_u64(1000);
    let mut account = Account {
        owner: [0xAB; 32],
        balance: u128::MAX,
        last_order: order(),
    };

    push_spread_root(&mut account, &root, &mut env).unwrap();
    assert_eq!(env.host().len(), 3);

    let pulled: Account = pull_spread_root(&root, &mut env);
    assert_eq!(pulled, account);
}

#[test]
fn test_spread_fields_are_independent() {
    let mut env = setup();
    let root = Key::zero();
    let mut account = Account::default();
    push_spread_root(&mut account, &root, &mut env).unwrap();

    // Only the balance cell changes on disk.
    let before = env.host().raw(&Key::from_u64(3)).map(<[u8]>::to_vec);
    env.set_contract_storage(&Key::from_u64(2), &500u128).unwrap();

    let pulled: Account = pull_spread_root(&root, &mut env);
    assert_eq!(pulled.balance, 500);
    assert_eq!(env.host().raw(&Key::from_u64(3)).map(<[u8]>::to_vec), before);
}

#[test]
fn test_idempotent_entry_flush() {
    let mut env = setup();
    let key = Key::from_u64(4);
    let mut entry = StorageEntry::new(order());

    entry.push_packed_root(&key, &mut env).unwrap();
    entry.push_packed_root(&key, &mut env).unwrap();
    assert_eq!(env.host().stats().writes, 1);

    entry.get_mut().unwrap().id = 10;
    entry.push_packed_root(&key, &mut env).unwrap();
    entry.push_packed_root(&key, &mut env).unwrap();
    assert_eq!(env.host().stats().writes, 2);
}

#[test]
fn test_idempotent_vector_flush() {
    let mut env = setup();
    let mut vec = Vector::new();
    for value in 0..10u64 {
        vec.push(value).unwrap();
    }

    push_spread_root(&mut vec, &Key::zero(), &mut env).unwrap();
    assert_eq!(env.host().stats().writes, 11);

    // Only the length cell is rewritten.
    push_spread_root(&mut vec, &Key::zero(), &mut env).unwrap();
    assert_eq!(env.host().stats().writes, 12);
}

#[test]
fn test_clear_then_get_fails() {
    let mut env = setup();

    let mut entry = StorageEntry::new(1u8);
    entry.clear();
    assert!(matches!(entry.get(), Err(StorageError::EmptyEntry)));

    let mut lazy = Lazy::new(1u8);
    lazy.clear();
    assert!(matches!(lazy.get(&mut env), Err(StorageError::EmptyEntry)));

    let mut map = LazyIndexMap::from_key(Key::zero());
    map.set(0, 1u8);
    map.delete(0);
    assert!(matches!(map.get(0, &mut env), Err(StorageError::EmptyEntry)));
}

#[test]
fn test_lazy_map_keys_never_collide() {
    let mut rng = StdRng::seed_from_u64(0x7e55e7a);
    let base = Key::from_bytes(rng.gen());
    let map = LazyIndexMap::<u8>::from_key(base);

    for _ in 0..10_000 {
        let i: u32 = rng.gen();
        let j: u32 = rng.gen();
        if i != j {
            assert_ne!(map.key_at(i), map.key_at(j), "indices {} and {}", i, j);
        }
    }

    let indices: HashSet<u32> = (0..10_000).map(|_| rng.gen()).collect();
    let keys: HashSet<Key> = indices.iter().filter_map(|index| map.key_at(*index)).collect();
    assert_eq!(keys.len(), indices.len());

    for index in [0u32, 1, u32::MAX - 1, u32::MAX] {
        assert_ne!(map.key_at(index), map.key_at(index.wrapping_add(1)));
    }
}

#[test]
fn test_vector_length_invariant() {
    let mut env = setup();
    let mut rng = StdRng::seed_from_u64(42);
    let root = Key::from_u64(5);
    let mut vec: Vector<u32> = Vector::new();
    let mut model: Vec<u32> = Vec::new();

    for step in 0..400 {
        match rng.gen_range(0..10) {
            0..=4 => {
                let value = rng.gen();
                vec.push(value).unwrap();
                model.push(value);
            }
            5 | 6 => match model.pop() {
                Some(expected) => assert_eq!(vec.pop(&mut env).unwrap(), expected),
                None => assert!(matches!(vec.pop(&mut env), Err(StorageError::EmptyVector))),
            },
            7 => {
                if model.pop().is_some() {
                    vec.remove_last().unwrap();
                }
            }
            8 => {
                if step % 3 == 0 {
                    vec.clear();
                    model.clear();
                }
            }
            _ => {
                push_spread_root(&mut vec, &root, &mut env).unwrap();
                vec = pull_spread_root(&root, &mut env);
            }
        }

        assert_eq!(vec.len() as usize, model.len());
        let len = vec.len();
        assert!(matches!(
            vec.get(len, &mut env),
            Err(StorageError::IndexOutOfBounds { .. })
        ));
        if let Some(last) = model.last() {
            assert_eq!(vec.get(len - 1, &mut env).unwrap(), last);
        }
    }

    push_spread_root(&mut vec, &root, &mut env).unwrap();
    let mut pulled: Vector<u32> = pull_spread_root(&root, &mut env);
    for (index, expected) in model.iter().enumerate() {
        assert_eq!(pulled.get(index as u32, &mut env).unwrap(), expected);
    }
}

struct Profile {
    name: String,
    age: u8,
    bio: Lazy<String>,
    settings: Pack<Order>,
    tags: Vec<String>,
}

spread_layout!(Profile {
    name: String,
    age: u8,
    bio: Lazy<String>,
    settings: Pack<Order>,
    tags: Vec<String>,
});

#[test]
fn test_layout_matches_written_keys() {
    let mut env = setup();
    let root = Key::from_u64(300);
    let mut profile = Profile {
        name: String::from("alice"),
        age: 30,
        bio: Lazy::new(String::from("hello")),
        settings: Pack::new(order()),
        tags: vec![String::from("admin")],
    };
    push_spread_root(&mut profile, &root, &mut env).unwrap();

    let written: BTreeSet<_> = env.host().keys().iter().map(Key::to_bytes).collect();
    let described: BTreeSet<_> = layout_at::<Profile>(&root)
        .cell_keys()
        .iter()
        .map(Key::to_bytes)
        .collect();
    assert_eq!(written, described);
}

#[test]
fn test_pull_missing_field_fails() {
    let mut env = setup();
    env.set_contract_storage(&Key::from_u64(1), &[0u8; 32]).unwrap();

    let result: Result<Account, _> = try_pull_spread_root(&Key::zero(), &mut env);
    assert!(result.unwrap_err().is_not_found());
}
