/**
 * Allowlist Merkle Verification
 *
 * Leaves commit to (launch id, contributor); interior nodes hash the
 * lexicographically sorted pair, so proofs carry no left/right flags.
 */

use anchor_lang::prelude::*;
use solana_keccak_hasher as keccak;

/// Leaf for a contributor on a given launch
pub fn leaf_hash(launch_id: u64, contributor: &Pubkey) -> [u8; 32] {
    keccak::hashv(&[&launch_id.to_le_bytes(), contributor.as_ref()]).0
}

/// Verify a sorted-pair Merkle proof against the launch's allowlist root
pub fn verify(proof: &[[u8; 32]], root: &[u8; 32], leaf: [u8; 32]) -> bool {
    let mut node = leaf;
    for sibling in proof {
        node = if node <= *sibling {
            keccak::hashv(&[&node, sibling]).0
        } else {
            keccak::hashv(&[sibling, &node]).0
        };
    }
    node == *root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent(a: [u8; 32], b: [u8; 32]) -> [u8; 32] {
        if a <= b {
            keccak::hashv(&[&a, &b]).0
        } else {
            keccak::hashv(&[&b, &a]).0
        }
    }

    #[test]
    fn four_leaf_tree() {
        let launch_id = 1u64;
        let members: Vec<Pubkey> = (0..4).map(|_| Pubkey::new_unique()).collect();
        let leaves: Vec<[u8; 32]> = members.iter().map(|m| leaf_hash(launch_id, m)).collect();

        let n01 = parent(leaves[0], leaves[1]);
        let n23 = parent(leaves[2], leaves[3]);
        let root = parent(n01, n23);

        // every member verifies with its sibling path
        assert!(verify(&[leaves[1], n23], &root, leaves[0]));
        assert!(verify(&[leaves[0], n23], &root, leaves[1]));
        assert!(verify(&[leaves[3], n01], &root, leaves[2]));
        assert!(verify(&[leaves[2], n01], &root, leaves[3]));
    }

    #[test]
    fn non_member_rejected() {
        let launch_id = 1u64;
        let members: Vec<Pubkey> = (0..2).map(|_| Pubkey::new_unique()).collect();
        let leaves: Vec<[u8; 32]> = members.iter().map(|m| leaf_hash(launch_id, m)).collect();
        let root = parent(leaves[0], leaves[1]);

        let outsider = leaf_hash(launch_id, &Pubkey::new_unique());
        assert!(!verify(&[leaves[1]], &root, outsider));

        // a member's proof does not transfer to another launch
        let other_launch = leaf_hash(2, &members[0]);
        assert!(!verify(&[leaves[1]], &root, other_launch));
    }

    #[test]
    fn empty_proof_is_root_equality() {
        let leaf = leaf_hash(1, &Pubkey::new_unique());
        assert!(verify(&[], &leaf, leaf));
        assert!(!verify(&[], &[0u8; 32], leaf));
    }
}
