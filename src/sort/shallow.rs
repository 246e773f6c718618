// =-=-= sort/shallow.rs =-=-=
// Bentley-Sedgewick multikey quicksort over suffix prefixes, bounded by the
// shallow depth limit. Groups still tied at the limit are handed to the
// helped sorter; small groups go to an LCP-aware insertion sort.

use super::{Sorter, MAX_THRESH};

impl<'p> Sorter<'p> {
    // Sort one small bucket. Its suffixes share their first two bytes, so
    // comparisons start at depth 2.
    pub(crate) fn shallow_sort(&mut self, lo: usize, n: usize) {
        let w = self.params.word_size;
        self.shallow_mkq(lo, n, 2, w);
    }

    // `w` bytes of key per level, big-endian for the wide variants
    #[inline]
    fn shallow_key(&self, pos: i32, depth: i32, w: i32) -> u32 {
        let p = (pos + depth) as usize;
        match w {
            1 => self.text[p] as u32,
            2 => ((self.text[p] as u32) << 8) | self.text[p + 1] as u32,
            _ => u32::from_be_bytes([
                self.text[p],
                self.text[p + 1],
                self.text[p + 2],
                self.text[p + 3],
            ]),
        }
    }

    // Median of three by the single byte at `depth`; pivot pre-selection is
    // byte-wise even when the partition key is wider.
    fn med3(&self, a: usize, b: usize, c: usize, depth: i32) -> usize {
        let va = self.text[(self.sa[a] + depth) as usize];
        let vb = self.text[(self.sa[b] + depth) as usize];
        if va == vb {
            return a;
        }
        let vc = self.text[(self.sa[c] + depth) as usize];
        if vc == va || vc == vb {
            return c;
        }
        if va < vb {
            if vb < vc {
                b
            } else if va < vc {
                c
            } else {
                a
            }
        } else if vb > vc {
            b
        } else if va < vc {
            a
        } else {
            c
        }
    }

    pub(crate) fn vecswap(&mut self, a: usize, b: usize, n: usize) {
        for k in 0..n {
            self.sa.swap(a + k, b + k);
        }
    }

    fn shallow_mkq(&mut self, lo: usize, n: usize, mut depth: i32, w: i32) {
        debug_assert!(n > 0);

        if n < self.params.mk_qs_thresh as usize {
            self.shallow_inssort_lcp(lo, n, depth);
            return;
        }

        loop {
            // Tukey ninther for big groups, median of three otherwise
            let (mut pl, mut pm, mut pr) = (lo, lo + n / 2, lo + n - 1);
            if n > 30 {
                let d = n / 8;
                pl = self.med3(pl, pl + d, pl + 2 * d, depth);
                pm = self.med3(pm - d, pm, pm + d, depth);
                pr = self.med3(pr - 2 * d, pr - d, pr, depth);
            }
            let pm = self.med3(pl, pm, pr, depth);
            self.sa.swap(lo, pm);
            let partval = self.shallow_key(self.sa[lo], depth, w);

            // three-way partition; equal keys collect at both ends
            let (mut pa, mut pb) = (1usize, 1usize);
            let (mut pc, mut pd) = (n - 1, n - 1);
            loop {
                while pb <= pc {
                    let val = self.shallow_key(self.sa[lo + pb], depth, w);
                    if val > partval {
                        break;
                    }
                    if val == partval {
                        self.sa.swap(lo + pa, lo + pb);
                        pa += 1;
                    }
                    pb += 1;
                }
                while pb <= pc {
                    let val = self.shallow_key(self.sa[lo + pc], depth, w);
                    if val < partval {
                        break;
                    }
                    if val == partval {
                        self.sa.swap(lo + pc, lo + pd);
                        pd -= 1;
                    }
                    pc -= 1;
                }
                if pb > pc {
                    break;
                }
                self.sa.swap(lo + pb, lo + pc);
                pb += 1;
                pc -= 1;
            }

            if pa > pd {
                // the whole group ties with the pivot: advance in place
                let next = depth + w;
                if next >= self.params.shallow_limit {
                    self.helped_sort(lo, n, next);
                    return;
                }
                depth = next;
                continue;
            }

            // move the equal blocks to the middle
            let r = pa.min(pb - pa);
            self.vecswap(lo, lo + pb - r, r);
            let r = (pd - pc).min(n - 1 - pd);
            self.vecswap(lo + pb, lo + n - r, r);

            let lt = pb - pa;
            let gt = pd - pc;
            let eq = n - lt - gt;

            if lt > 1 {
                self.shallow_mkq(lo, lt, depth, w);
            }
            let next = depth + w;
            if next < self.params.shallow_limit {
                self.shallow_mkq(lo + lt, eq, next, w);
            } else {
                self.helped_sort(lo + lt, eq, next);
            }
            if gt > 1 {
                self.shallow_mkq(lo + n - gt, gt, depth, w);
            }
            return;
        }
    }

    // Byte comparison capped at `limit` equal bytes: the difference at the
    // first mismatch (0 when tied through the cap) plus the equal count.
    fn cmp_shallow(&self, p1: i32, p2: i32, limit: i32) -> (i32, i32) {
        let mut k = 0i32;
        while k < limit {
            let c1 = self.text[(p1 + k) as usize];
            let c2 = self.text[(p2 + k) as usize];
            if c1 != c2 {
                return (c1 as i32 - c2 as i32, k);
            }
            k += 1;
        }
        (0, limit)
    }

    // Insertion sort tracking, for each adjacent pair of the sorted output,
    // the LCP of their suffixes capped at the shallow limit.
    //
    // While inserting a[i], `lcpi` is the LCP between a[i] and the element it
    // was last compared against; comparing lcpi with the stored pair LCPs
    // decides strict dominance without touching the text again. Runs still
    // tied at the cap afterwards form the groups for the helped sorter.
    fn shallow_inssort_lcp(&mut self, lo: usize, n: usize, depth: i32) {
        let cmp_from_limit = self.params.shallow_limit - depth;

        // pair LCPs, shifted by one so the guard below index 0 is lcps[0]
        let mut lcps = [0i32; (MAX_THRESH + 2) as usize];
        lcps[0] = -1;

        for i in 1..n {
            let ai = self.sa[lo + i];
            let mut lcpi: i32 = 0;
            let mut j = i as isize;
            let mut j1 = j - 1;
            loop {
                let (r, matched) = self.cmp_shallow(
                    self.sa[lo + j1 as usize] + depth + lcpi,
                    ai + depth + lcpi,
                    cmp_from_limit - lcpi,
                );
                let lcp_new = lcpi + matched;
                debug_assert!(r != 0 || lcp_new >= cmp_from_limit);

                if r <= 0 {
                    // ai sorts at j; record its LCP with the predecessor
                    lcps[(j1 + 1) as usize] = lcp_new;
                    break;
                }

                // ai sorts below a[j1]: shift, then ride the pair LCPs down
                lcpi = lcp_new;
                loop {
                    self.sa[lo + j as usize] = self.sa[lo + j1 as usize];
                    lcps[(j + 1) as usize] = lcps[(j1 + 1) as usize];
                    j = j1;
                    j1 -= 1;
                    if lcpi >= lcps[(j1 + 1) as usize] {
                        break;
                    }
                }
                if lcpi > lcps[(j1 + 1) as usize] {
                    break;
                }
            }
            self.sa[lo + j as usize] = ai;
            lcps[(j + 1) as usize] = lcpi;
        }

        // forward maximal runs tied at the cap for deep resolution
        let mut i = 0usize;
        while i + 1 < n {
            let mut j = i;
            while j < n {
                if lcps[j + 1] < cmp_from_limit {
                    break;
                }
                j += 1;
            }
            if j > i {
                debug_assert!(j < n);
                self.helped_sort(lo + i, j - i + 1, self.params.shallow_limit);
            }
            i = j + 1;
        }
    }
}
