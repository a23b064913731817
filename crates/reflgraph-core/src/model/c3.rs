//! C3 linearization for classes declared in an [`super::ObjectModel`].

use super::ObjId;

/// Merge the resolution orders of `bases` into the order of a new class.
///
/// `mro_of` returns the already computed order of each base. Returns `None`
/// when no consistent order exists.
pub(crate) fn linearize(
    class: ObjId,
    bases: &[ObjId],
    mro_of: impl Fn(ObjId) -> Vec<ObjId>,
) -> Option<Vec<ObjId>> {
    let mut seqs: Vec<Vec<ObjId>> = bases.iter().map(|base| mro_of(*base)).collect();
    seqs.push(bases.to_vec());

    let mut result = vec![class];
    loop {
        seqs.retain(|seq| !seq.is_empty());
        if seqs.is_empty() {
            return Some(result);
        }

        // first head that appears in no tail
        let head = seqs
            .iter()
            .map(|seq| seq[0])
            .find(|candidate| !seqs.iter().any(|seq| seq[1..].contains(candidate)))?;

        result.push(head);
        for seq in &mut seqs {
            if seq[0] == head {
                seq.remove(0);
            }
        }
    }
}
