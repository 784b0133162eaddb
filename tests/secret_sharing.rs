//!
//! 秘密共享集成测试
//!
//! 覆盖 64 字节秘密在 (N = 10, T = 4) 下的全部份额组合，以及门限以下的失败路径。
//!

mod common;

use common::seeded_rng;
use quorum_seal::threshold::sharer::split_secret_with_rng;
use quorum_seal::{
    SecretSharer, SecretSharingError, Share, SharingConfig, combine_shares, split_secret,
};

const SECRET_HEX: &str = "76850a8752ae00ddc1453a842eb5cd340aef6cd384e3a7e978a6ebc7a335d295\
                          347092a5b3b1c044404b3095458eb239e92b723c6ff609bd21913e2d0f13326f";

fn secret() -> Vec<u8> {
    hex::decode(SECRET_HEX).unwrap()
}

fn pick(shares: &[Share], indices: &[usize]) -> Vec<Share> {
    indices.iter().map(|&i| shares[i].clone()).collect()
}

/// 按字典序列出 `0..n` 中所有大小为 `k` 的子集
fn subsets(n: usize, k: usize) -> Vec<Vec<usize>> {
    fn walk(
        start: usize,
        n: usize,
        k: usize,
        current: &mut Vec<usize>,
        out: &mut Vec<Vec<usize>>,
    ) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in start..n {
            current.push(i);
            walk(i + 1, n, k, current, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    walk(0, n, k, &mut Vec::with_capacity(k), &mut out);
    out
}

// === 恢复 ===

#[test]
fn test_selected_shares_recover_and_pair_fails() {
    let secret = secret();
    assert_eq!(secret.len(), 64);
    let shares = split_secret(&secret, 10, 4).unwrap();
    assert_eq!(shares.len(), 10);

    assert_eq!(
        combine_shares(&pick(&shares, &[0, 2, 5, 7])).unwrap(),
        secret
    );
    assert_eq!(
        combine_shares(&pick(&shares, &[1, 3])),
        Err(SecretSharingError::InsufficientShares {
            threshold: 4,
            got: 2
        })
    );
}

#[test]
fn test_every_threshold_subset_recovers() {
    let secret = secret();
    let shares = split_secret_with_rng(&secret, 10, 4, &mut seeded_rng(200)).unwrap();

    let all = subsets(10, 4);
    assert_eq!(all.len(), 210);
    for indices in all {
        assert_eq!(
            combine_shares(&pick(&shares, &indices)).unwrap(),
            secret,
            "subset {indices:?}"
        );
    }
}

#[test]
fn test_every_below_threshold_subset_fails() {
    let shares = split_secret_with_rng(&secret(), 10, 4, &mut seeded_rng(201)).unwrap();

    for size in 1..4 {
        for indices in subsets(10, size) {
            assert_eq!(
                combine_shares(&pick(&shares, &indices)),
                Err(SecretSharingError::InsufficientShares {
                    threshold: 4,
                    got: size
                })
            );
        }
    }
}

#[test]
fn test_more_than_threshold_shares_recover() {
    let secret = secret();
    let shares = split_secret_with_rng(&secret, 10, 4, &mut seeded_rng(202)).unwrap();

    for size in 5..=10 {
        assert_eq!(combine_shares(&shares[10 - size..]).unwrap(), secret);
    }
}

#[test]
fn test_duplicated_shares_do_not_reach_threshold() {
    let shares = split_secret_with_rng(&secret(), 10, 4, &mut seeded_rng(203)).unwrap();
    let repeated = pick(&shares, &[2, 2, 5, 5, 8]);

    assert_eq!(
        combine_shares(&repeated),
        Err(SecretSharingError::InsufficientShares {
            threshold: 4,
            got: 3
        })
    );
}

// === 隐私性 ===

#[test]
fn test_three_shares_leave_every_secret_reachable() {
    let fixed = pick(
        &split_secret_with_rng(&[0u8; 64], 10, 4, &mut seeded_rng(204)).unwrap(),
        &[0, 1, 2],
    );
    // 补上 x = 4 的第四个份额后恢复
    let complete_with = |payload: &[u8]| {
        let mut bytes = vec![4u8, 4];
        bytes.extend_from_slice(payload);
        let mut shares = fixed.clone();
        shares.push(Share::from_bytes(bytes));
        combine_shares(&shares).unwrap()
    };

    // preimage[i][b]：让第 i 个字节恢复为 b 的第四份额 y 值
    let mut preimage = vec![[None::<u8>; 256]; 64];
    for y in 0..=255u8 {
        for (i, &byte) in complete_with(&[y; 64]).iter().enumerate() {
            preimage[i][byte as usize] = Some(y);
        }
    }
    // 每个位置上 y 到秘密字节都是双射，三个份额排除不了任何取值
    assert!(preimage.iter().all(|row| row.iter().all(Option::is_some)));

    for target in [secret(), vec![0xFF; 64], (0..64u8).collect()] {
        let payload: Vec<u8> = target
            .iter()
            .enumerate()
            .map(|(i, &byte)| preimage[i][byte as usize].unwrap())
            .collect();
        assert_eq!(complete_with(&payload), target);
    }
}

#[test]
fn test_share_values_spread_over_field() {
    // 常量秘密的份额字节应覆盖 GF(2^8) 的大部分取值
    let shares = split_secret_with_rng(&[0u8; 64], 10, 4, &mut seeded_rng(205)).unwrap();
    let mut seen = [false; 256];
    for share in &shares {
        for &byte in &share.as_bytes()[2..] {
            seen[byte as usize] = true;
        }
    }
    assert!(seen.iter().filter(|&&s| s).count() > 200);
}

// === 配置驱动 ===

#[test]
fn test_default_sharer_configuration() {
    let sharer = SecretSharer::default();
    assert_eq!(sharer.config(), &SharingConfig::default());

    let secret = secret();
    let shares = sharer.split(&secret).unwrap();
    assert_eq!(shares.len(), 10);
    assert_eq!(sharer.combine(&shares[3..7]).unwrap(), secret);

    assert!(matches!(
        sharer.split(&secret[..32]),
        Err(SecretSharingError::InvalidParameter(_))
    ));
}

#[test]
fn test_tampered_share_yields_wrong_secret() {
    let secret = secret();
    let shares = split_secret_with_rng(&secret, 10, 4, &mut seeded_rng(206)).unwrap();

    let mut bytes = shares[0].as_bytes().to_vec();
    bytes[10] ^= 0x01;
    let mut tampered = vec![Share::from_bytes(bytes)];
    tampered.extend(pick(&shares, &[1, 2, 3]));

    let recovered = combine_shares(&tampered).unwrap();
    assert_ne!(recovered, secret);
    // 篡改只影响对应的字节位置
    let differing: Vec<usize> = (0..64).filter(|&i| recovered[i] != secret[i]).collect();
    assert_eq!(differing, vec![8]);
}
