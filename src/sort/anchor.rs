// =-=-= sort/anchor.rs =-=-=
// Helped sorting: a group tied at the shallow limit is ordered from the
// known rank of a nearby suffix in an already sorted bucket. Forward and
// backward anchors are tried first, then a bucket-splitting forward anchor,
// then a pseudo anchor, and finally the deep sorter.

use super::Sorter;

// Transient per-entry marker; the text size cap keeps this bit free.
const MARKER: i32 = i32::MIN;

impl<'p> Sorter<'p> {
    // Sort a[lo..lo+n] sharing a `depth`-byte prefix. Every successful path
    // feeds the final ordering back into the anchor map.
    pub(crate) fn helped_sort(&mut self, lo: usize, n: usize, depth: i32) {
        self.stats.helped_sorts += 1;
        if n == 1 {
            if self.params.anchor_dist > 0 {
                self.update_anchors(lo, n);
            }
            return;
        }

        if self.params.anchor_dist == 0 {
            self.pseudo_or_deep_sort(lo, n, depth);
            return;
        }

        self.anchored_sort(lo, n, depth);
        self.update_anchors(lo, n);
    }

    // For every group member, consider the anchor of its own region and the
    // nearest one past it; keep the closest usable candidate of each kind.
    fn anchored_sort(&mut self, lo: usize, n: usize, depth: i32) {
        let ad = self.params.anchor_dist;
        let curr_sb = self.small_bucket(self.sa[lo]);

        let mut min_forw = i32::MAX;
        let mut min_forw_buc = i32::MAX;
        let mut max_back = i32::MIN;
        let mut best_forw: i32 = -1;
        let mut best_forw_buc: i32 = -1;
        let mut best_back: i32 = -1;
        let mut forw_idx = 0usize;
        let mut forw_idx_buc = 0usize;
        let mut back_idx = 0usize;

        for i in 0..n {
            let text_pos = self.sa[lo + i];
            let mut anchor = text_pos / ad;
            let toffset = text_pos % ad;
            let aoffset = self.anchor_offset[anchor as usize] as i32;
            if aoffset < ad {
                let diff = aoffset - toffset;
                debug_assert!(diff != 0);
                if diff > 0 {
                    if curr_sb != self.small_bucket(text_pos + diff) {
                        if diff < min_forw {
                            min_forw = diff;
                            best_forw = anchor;
                            forw_idx = i;
                        }
                    } else if diff < min_forw_buc {
                        min_forw_buc = diff;
                        best_forw_buc = anchor;
                        forw_idx_buc = i;
                    }
                } else {
                    if diff > max_back {
                        max_back = diff;
                        best_back = anchor;
                        back_idx = i;
                    }
                    // the nearest anchor just past this suffix
                    anchor += 1;
                    let aoffset = self.anchor_offset[anchor as usize] as i32;
                    if aoffset < ad {
                        let diff = ad + aoffset - toffset;
                        debug_assert!(diff > 0);
                        if curr_sb != self.small_bucket(text_pos + diff) {
                            if diff < min_forw {
                                min_forw = diff;
                                best_forw = anchor;
                                forw_idx = i;
                            }
                        } else if diff < min_forw_buc {
                            min_forw_buc = diff;
                            best_forw_buc = anchor;
                            forw_idx_buc = i;
                        }
                    }
                }
            }
        }

        if best_forw >= 0 && min_forw < depth - 1 {
            self.stats.forward_anchor_sorts += 1;
            debug_assert!(min_forw < 2 * ad);
            let anchor_pos = self.sa[lo + forw_idx] + min_forw;
            let anchor_rank = self.anchor_rank[best_forw as usize];
            debug_assert_eq!(self.sa[anchor_rank as usize], anchor_pos);
            self.anchor_sort(lo, n, anchor_pos, anchor_rank, min_forw);
            return;
        }

        if best_back >= 0 && self.backward_anchor_usable(lo, n, max_back) {
            self.stats.backward_anchor_sorts += 1;
            let anchor_pos = self.sa[lo + back_idx] + max_back;
            let anchor_rank = self.anchor_rank[best_back as usize];
            debug_assert_eq!(self.sa[anchor_rank as usize], anchor_pos);
            self.anchor_sort(lo, n, anchor_pos, anchor_rank, max_back);
            return;
        }

        if best_forw_buc >= 0 && min_forw_buc < depth - 1 {
            debug_assert!(min_forw_buc < 2 * ad);
            let anchor_pos = self.sa[lo + forw_idx_buc] + min_forw_buc;
            let anchor_rank = self.anchor_rank[best_forw_buc as usize];
            debug_assert_eq!(self.sa[anchor_rank as usize], anchor_pos);

            // the shifted suffixes live in the group's own bucket, so only
            // the members matching the pivot through the offset can be
            // ordered from the anchor
            let (lower, equal) = self.split_group(lo, n, depth, min_forw_buc, forw_idx_buc);
            self.stats.forward_anchor_sorts += 1;
            if equal == n {
                self.anchor_sort(lo, n, anchor_pos, anchor_rank, min_forw_buc);
            } else {
                let upper = n - equal - lower;
                if equal > 1 {
                    self.anchor_sort(lo + lower, equal, anchor_pos, anchor_rank, min_forw_buc);
                }
                if lower > 1 {
                    self.pseudo_or_deep_sort(lo, lower, depth);
                }
                if upper > 1 {
                    self.pseudo_or_deep_sort(lo + lower + equal, upper, depth);
                }
            }
            return;
        }

        self.pseudo_or_deep_sort(lo, n, depth);
    }

    // A backward anchor only works if every member reaches back to it and
    // the preceding bytes agree across the whole group.
    fn backward_anchor_usable(&self, lo: usize, n: usize, diff: i32) -> bool {
        debug_assert!(diff > -self.params.anchor_dist && diff < 0);
        for i in 0..n {
            if self.sa[lo + i] + diff < 0 {
                return false;
            }
        }
        let t0 = self.sa[lo];
        for i in 1..n {
            let ti = self.sa[lo + i];
            for j in diff..0 {
                if self.text[(t0 + j) as usize] != self.text[(ti + j) as usize] {
                    return false;
                }
            }
        }
        true
    }

    // Order the group from a suffix of known rank found `off` bytes into the
    // members' common prefix. Expanding outward from the anchor rank inside
    // its bucket, mark every rank whose suffix minus `off` belongs to the
    // group; a single sweep over the marked span then yields the ordering.
    fn anchor_sort(&mut self, lo: usize, n: usize, anchor_pos: i32, anchor_rank: i32, off: i32) {
        debug_assert_eq!(self.sa[anchor_rank as usize], anchor_pos);
        let sb = self.small_bucket(anchor_pos);
        let bucket_lo = self.bucket_first(sb) as usize;
        let bucket_hi = self.bucket_last(sb) as usize;
        debug_assert_eq!(sb, self.small_bucket(self.sa[lo] + off));

        self.sa[lo..lo + n].sort_unstable();

        let mut curr_lo = anchor_rank as usize;
        let mut curr_hi = curr_lo;
        self.mark(curr_lo);

        let mut to_find = n - 1;
        while to_find > 0 {
            debug_assert!(curr_lo > bucket_lo || curr_hi < bucket_hi);
            while curr_lo > bucket_lo {
                curr_lo -= 1;
                let item = self.sa[curr_lo] - off;
                if self.sa[lo..lo + n].binary_search(&item).is_ok() {
                    self.mark(curr_lo);
                    to_find -= 1;
                } else {
                    break;
                }
            }
            while curr_hi < bucket_hi {
                curr_hi += 1;
                let item = self.sa[curr_hi] - off;
                if self.sa[lo..lo + n].binary_search(&item).is_ok() {
                    self.mark(curr_hi);
                    to_find -= 1;
                } else {
                    break;
                }
            }
        }

        let mut j = 0usize;
        for i in curr_lo..=curr_hi {
            if self.sa[i] & MARKER != 0 {
                self.sa[i] &= !MARKER;
                self.sa[lo + j] = self.sa[i] - off;
                j += 1;
            }
        }
        debug_assert_eq!(j, n);
    }

    #[inline]
    fn mark(&mut self, rank: usize) {
        debug_assert_eq!(self.sa[rank] & MARKER, 0);
        self.sa[rank] |= MARKER;
    }

    // Probe small offsets into the common prefix for a position lying in an
    // already sorted bucket; such a "pseudo anchor" works exactly like a
    // real one. Otherwise fall through to the deep sorter.
    pub(crate) fn pseudo_or_deep_sort(&mut self, lo: usize, n: usize, depth: i32) {
        if self.params.max_pseudo_anchor_offset > 0 {
            let max_offset = (depth - 1).min(self.params.max_pseudo_anchor_offset);
            let text_pos = self.sa[lo];
            for offset in 1..max_offset {
                let pseudo_anchor_pos = text_pos + offset;
                let sb = self.small_bucket(pseudo_anchor_pos);
                if self.is_sorted_bucket(sb) {
                    /* skip buckets far larger than the group */
                    let size = self.bucket_size(sb);
                    if size as i64 > self.params.b2g_ratio as i64 * n as i64 {
                        continue;
                    }
                    self.pseudo_anchor_sort(lo, n, pseudo_anchor_pos, offset);
                    self.stats.pseudo_anchor_sorts += 1;
                    return;
                }
            }
        }
        self.deep_sort(lo, n, depth);
    }

    fn pseudo_anchor_sort(&mut self, lo: usize, n: usize, pseudo_anchor_pos: i32, offset: i32) {
        let rank = if self.params.update_anchor_ranks && self.params.anchor_dist > 0 {
            self.rank_update_anchors(pseudo_anchor_pos)
        } else {
            self.rank_of(pseudo_anchor_pos)
        };
        debug_assert_eq!(self.sa[rank as usize], pseudo_anchor_pos);
        self.anchor_sort(lo, n, pseudo_anchor_pos, rank, offset);
    }

    // Rank of a suffix lying in an already sorted bucket.
    fn rank_of(&self, pos: i32) -> i32 {
        let sb = self.small_bucket(pos);
        assert!(
            self.is_sorted_bucket(sb),
            "rank lookup outside a sorted bucket"
        );
        for j in self.bucket_first(sb)..=self.bucket_last(sb) {
            if self.sa[j as usize] == pos {
                return j;
            }
        }
        panic!("suffix missing from its sorted bucket");
    }

    // Rank lookup that also harvests anchors from the whole bucket, at most
    // once per bucket per run.
    fn rank_update_anchors(&mut self, pos: i32) -> i32 {
        let ad = self.params.anchor_dist;
        debug_assert!(ad > 0);
        let sb = self.small_bucket(pos);
        assert!(
            self.is_sorted_bucket(sb),
            "rank lookup outside a sorted bucket"
        );
        if self.bucket_ranked[sb] {
            return self.rank_of(pos);
        }
        self.bucket_ranked[sb] = true;

        let mut rank = -1;
        for j in self.bucket_first(sb)..=self.bucket_last(sb) {
            let sa_j = self.sa[j as usize];
            let anchor = (sa_j / ad) as usize;
            let toffset = (sa_j % ad) as u16;
            if toffset < self.anchor_offset[anchor] {
                self.anchor_offset[anchor] = toffset;
                self.anchor_rank[anchor] = j;
            }
            if sa_j == pos {
                debug_assert_eq!(rank, -1);
                rank = j;
            }
        }
        debug_assert!(rank >= 0);
        rank
    }

    // Three-way split of the group on the bytes at depth..depth+offset
    // relative to the pivot member, one byte per level as in the multikey
    // partition. Returns (lower, equal): the equal block starts at `lower`
    // and holds `equal` members.
    fn split_group(
        &mut self,
        lo: usize,
        n: usize,
        depth: i32,
        offset: i32,
        pivot: usize,
    ) -> (usize, usize) {
        let pivot_pos = self.sa[lo + pivot];
        let mut d = depth;
        let limit = depth + offset;

        let mut pa: isize = 0;
        let mut pd: isize = n as isize - 1;

        while pa != pd && d < limit {
            let partval = self.text[(pivot_pos + d) as usize] as i32;

            let (mut pb, pa_old) = (pa, pa);
            let (mut pc, pd_old) = (pd, pd);
            loop {
                while pb <= pc {
                    let r = self.text[(self.sa[lo + pb as usize] + d) as usize] as i32 - partval;
                    if r > 0 {
                        break;
                    }
                    if r == 0 {
                        self.sa.swap(lo + pa as usize, lo + pb as usize);
                        pa += 1;
                    }
                    pb += 1;
                }
                while pb <= pc {
                    let r = self.text[(self.sa[lo + pc as usize] + d) as usize] as i32 - partval;
                    if r < 0 {
                        break;
                    }
                    if r == 0 {
                        self.sa.swap(lo + pc as usize, lo + pd as usize);
                        pd -= 1;
                    }
                    pc -= 1;
                }
                if pb > pc {
                    break;
                }
                self.sa.swap(lo + pb as usize, lo + pc as usize);
                pb += 1;
                pc -= 1;
            }

            let r = (pa - pa_old).min(pb - pa) as usize;
            self.vecswap(lo + pa_old as usize, lo + (pb as usize) - r, r);
            let r = (pd_old - pd).min(pd - pc) as usize;
            self.vecswap(lo + pb as usize, lo + (pd_old as usize) + 1 - r, r);

            pa = pa_old + (pb - pa);
            pd = pd_old - (pd - pc);
            d += 1;
        }

        debug_assert!(pd >= pa);
        (pa as usize, (pd - pa + 1) as usize)
    }

    // Record the final positions of a sorted group in the anchor map. This
    // is the sole writer of the map outside rank_update_anchors; offsets
    // only ever decrease.
    pub(crate) fn update_anchors(&mut self, lo: usize, n: usize) {
        let ad = self.params.anchor_dist;
        debug_assert!(ad > 0);
        for i in 0..n {
            let text_pos = self.sa[lo + i];
            let anchor = (text_pos / ad) as usize;
            let toffset = (text_pos % ad) as u16;
            if toffset < self.anchor_offset[anchor] {
                self.anchor_offset[anchor] = toffset;
                self.anchor_rank[anchor] = (lo + i) as i32;
                debug_assert_eq!(
                    self.sa[self.anchor_rank[anchor] as usize],
                    anchor as i32 * ad + self.anchor_offset[anchor] as i32
                );
            }
        }
    }
}
