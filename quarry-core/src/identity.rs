use crate::FieldMeta;

/// Indexes of the identity fields among the mapped fields, in declaration order.
///
/// First non empty rule wins:
/// 1. every field explicitly marked as identity;
/// 2. the only field whose explicit column name is `id`;
/// 3. the field named `id`;
/// 4. nothing, the entity is append only.
pub fn resolve_identity<E>(fields: &[FieldMeta<E>]) -> Vec<usize> {
    let marked: Vec<usize> = fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.identity)
        .map(|(i, _)| i)
        .collect();
    if !marked.is_empty() {
        return marked;
    }
    let mut renamed = fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.column_override == Some("id"))
        .map(|(i, _)| i);
    if let (Some(index), None) = (renamed.next(), renamed.next()) {
        return vec![index];
    }
    fields
        .iter()
        .position(|f| f.name == "id")
        .into_iter()
        .collect()
}
